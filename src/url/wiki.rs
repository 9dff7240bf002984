/// Path and query markers that identify non-article wiki pages
pub const WIKI_EXCLUDED_MARKERS: &[&str] = &[
    "/wiki/Special:",
    "/wiki/Talk:",
    "/wiki/Category:",
    "/wiki/Help:",
    "/wiki/Portal:",
    "/wiki/Wikipedia:",
    "/wiki/Template:",
    "/wiki/File:",
    "/wiki/MediaWiki:",
    "action=edit",
    "oldid=",
    "diff=",
    "printable=yes",
];

/// Fragment every followed wiki article link must contain
const WIKI_ARTICLE_PATH: &str = "wikipedia.org/wiki/";

/// Returns true if a URL belongs to a wiki-style site
///
/// Wiki mode applies to any `wikipedia.org` URL and to any URL containing
/// `wiki` in any letter case.
pub fn is_wiki_url(url: &str) -> bool {
    url.contains("wikipedia.org") || url.to_lowercase().contains("wiki")
}

/// Returns true if an absolute URL is a wiki article worth following
///
/// Namespace pages (`Special:`, `Talk:`, ...) and edit, diff, history and
/// printable views are rejected.
pub fn is_wiki_article_link(url: &str) -> bool {
    url.contains(WIKI_ARTICLE_PATH)
        && !WIKI_EXCLUDED_MARKERS
            .iter()
            .any(|marker| url.contains(marker))
}
