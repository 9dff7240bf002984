//! Link extraction from fetched pages
//!
//! This module turns a page's anchors into the set of absolute URLs the
//! frontier should learn about. Two rule sets exist:
//! - default mode keeps syntactically valid URLs that look like text content
//! - wiki mode reads only the main content region and keeps article links

use crate::url::{is_likely_text_content, is_syntactically_valid, is_wiki_article_link};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Element id of the main content region on MediaWiki pages
pub(crate) const WIKI_CONTENT_ID: &str = "mw-content-text";

/// Href prefixes that never lead to another page
const SKIPPED_HREF_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "#"];

/// Outbound links discovered on a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// De-duplicated absolute URLs, in first-seen order
    pub links: Vec<String>,
}

impl ExtractedLinks {
    /// Number of distinct links found
    pub fn count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Extracts the qualifying outbound links from an HTML document
///
/// # Link Extraction Rules
///
/// 1. The base URL is the page URL, overridden by `<base href>` if present
/// 2. Empty, `javascript:`, `mailto:`, `tel:` and fragment-only hrefs are skipped
/// 3. Each href is resolved against the base; unresolvable hrefs are skipped
/// 4. Wiki mode reads anchors from the main content region when it exists and
///    keeps only article links
/// 5. Default mode keeps URLs that are valid and likely text content
///
/// A single bad anchor never fails the extraction.
///
/// # Example
///
/// ```
/// use corpus_crawler::crawler::extract_links;
///
/// let html = r##"<a href="#top">Top</a><a href="/blog/a">A</a>"##;
/// let extracted = extract_links(html, "https://example.com/", false);
/// assert_eq!(extracted.links, vec!["https://example.com/blog/a".to_string()]);
/// ```
pub fn extract_links(html: &str, page_url: &str, is_wiki: bool) -> ExtractedLinks {
    let page_url = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot resolve links against {}: {}", page_url, e);
            return ExtractedLinks::default();
        }
    };

    let document = Html::parse_document(html);
    let base_url = effective_base_url(&document, &page_url);

    let anchor_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return ExtractedLinks::default(),
    };

    let root = if is_wiki {
        wiki_content_root(&document).unwrap_or_else(|| document.root_element())
    } else {
        document.root_element()
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in root.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let Some(absolute_url) = resolve_href(href, &base_url) else {
            continue;
        };

        let keep = if is_wiki {
            is_wiki_article_link(&absolute_url)
        } else {
            is_syntactically_valid(&absolute_url) && is_likely_text_content(&absolute_url)
        };

        if keep && seen.insert(absolute_url.clone()) {
            links.push(absolute_url);
        }
    }

    ExtractedLinks { links }
}

/// Finds the main content region of a wiki page
pub(crate) fn wiki_content_root(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse(&format!("div#{}", WIKI_CONTENT_ID)).ok()?;
    document.select(&selector).next()
}

/// Resolves the base URL, honoring a `<base href>` element
fn effective_base_url(document: &Html, page_url: &Url) -> Url {
    let base_href = Selector::parse("base[href]").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .map(str::trim)
    });

    match base_href {
        Some(href) if !href.is_empty() => page_url.join(href).unwrap_or_else(|e| {
            tracing::debug!("Ignoring unusable <base href=\"{}\">: {}", href, e);
            page_url.clone()
        }),
        _ => page_url.clone(),
    }
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel: schemes
/// - fragment-only links
/// - hrefs that cannot be resolved
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if SKIPPED_HREF_PREFIXES
        .iter()
        .any(|prefix| href.starts_with(prefix))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => Some(absolute_url.to_string()),
        Err(e) => {
            tracing::debug!("Skipping href {}: {}", href, e);
            None
        }
    }
}
