//! Readable text extraction from fetched pages
//!
//! Default mode flattens the whole document to whitespace-normalized text.
//! Wiki mode reads the main content region paragraph by paragraph and keeps
//! section headings as markdown-style `##` lines.

use crate::crawler::links::wiki_content_root;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

/// Title used when a document has no `<title>` element
pub const UNKNOWN_TITLE: &str = "Unknown Title";

const WIKI_HEADINGS: &[&str] = &["h2", "h3", "h4", "h5", "h6"];

/// Subtrees left out of the extracted text
struct SkipRules {
    tags: &'static [&'static str],
    classes: &'static [&'static str],
}

impl SkipRules {
    fn matches(&self, element: &Element) -> bool {
        self.tags.contains(&element.name())
            || element
                .classes()
                .any(|class| self.classes.contains(&class))
    }
}

const DEFAULT_SKIP: SkipRules = SkipRules {
    tags: &["script", "style", "noscript"],
    classes: &[],
};

const WIKI_SKIP: SkipRules = SkipRules {
    tags: &["script", "style", "noscript", "table"],
    classes: &["thumb", "navbox", "infobox"],
};

/// Text and title extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub title: String,
}

/// Extracts readable text and the title from an HTML document
///
/// Missing elements never cause a failure; each lookup has a fallback.
pub fn extract_content(html: &str, is_wiki: bool) -> ExtractedContent {
    let document = Html::parse_document(html);
    let title = extract_title(&document);

    let text = if is_wiki {
        match wiki_content_root(&document) {
            Some(content_root) => wiki_markdown(content_root, &title),
            None => flatten_text(document.root_element()),
        }
    } else {
        format!("# {}\n\n{}", title, flatten_text(document.root_element()))
    };

    ExtractedContent {
        text: collapse_blank_lines(&text),
        title,
    }
}

/// Extracts the document title, trimmed
fn extract_title(document: &Html) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Flattens visible text to single-space separated words
fn flatten_text(root: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    collect_text(root, &DEFAULT_SKIP, &mut pieces);

    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a wiki content region as a titled markdown-like document
fn wiki_markdown(content_root: ElementRef<'_>, title: &str) -> String {
    let mut blocks = Vec::new();
    collect_wiki_blocks(content_root, &mut blocks);
    format!("# {}\n\n{}", title, blocks.join("\n\n"))
}

/// Walks paragraphs and headings in document order
fn collect_wiki_blocks(element: ElementRef<'_>, blocks: &mut Vec<String>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        if WIKI_SKIP.matches(child.value()) {
            continue;
        }

        let name = child.value().name();
        if name == "p" || WIKI_HEADINGS.contains(&name) {
            let mut pieces = Vec::new();
            collect_text(child, &WIKI_SKIP, &mut pieces);
            let text = pieces.concat().trim().to_string();

            if text.is_empty() {
                continue;
            }
            if name == "p" {
                blocks.push(text);
            } else {
                blocks.push(format!("## {}", text));
            }
        } else {
            collect_wiki_blocks(child, blocks);
        }
    }
}

/// Collects text nodes beneath an element, skipping excluded subtrees
fn collect_text<'a>(element: ElementRef<'a>, skip: &SkipRules, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !skip.matches(child_element.value()) {
                collect_text(child_element, skip, pieces);
            }
        } else if let Some(text) = child.value().as_text() {
            pieces.push(&**text);
        }
    }
}

/// Replaces every newline, whitespace, newline run with one blank line
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\n') {
        collapsed.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let whitespace = &after[..after.len() - after.trim_start().len()];

        match whitespace.rfind('\n') {
            Some(last_newline) => {
                collapsed.push_str("\n\n");
                rest = &after[last_newline + 1..];
            }
            None => {
                collapsed.push('\n');
                rest = after;
            }
        }
    }

    collapsed.push_str(rest);
    collapsed
}
