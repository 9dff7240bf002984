use url::Url;

/// File extensions that never carry readable page text
const NON_TEXT_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "mp4", "mp3", "pdf", "zip", "exe", "js", "css",
    "xml",
];

/// Terminal path segments for auth, commerce, and API endpoints
const NON_CONTENT_SEGMENTS: &[&str] = &[
    "login", "logout", "signin", "signout", "register", "cart", "checkout", "api",
];

/// Substrings that suggest a URL points at article-like content
pub const TEXT_INDICATORS: &[&str] = &[
    "article",
    "blog",
    "post",
    "news",
    "story",
    "content",
    "text",
    "page",
    "read",
    "view",
    "doc",
    "document",
    "info",
    "about",
    "faq",
    "help",
    "guide",
    "tutorial",
    "wiki",
    "knowledge",
    "learn",
    "support",
];

/// Checks whether a URL is likely to lead to text content
///
/// Returns `false` when the path ends in a known binary, asset, or data
/// extension, or when its final segment is an auth, commerce, or API
/// endpoint. Everything else is assumed to be text.
///
/// # Examples
///
/// ```
/// use corpus_crawler::url::is_likely_text_content;
///
/// assert!(is_likely_text_content("https://example.com/blog/my-post"));
/// assert!(!is_likely_text_content("https://example.com/report.pdf"));
/// assert!(!is_likely_text_content("https://example.com/account/login/"));
/// ```
pub fn is_likely_text_content(url: &str) -> bool {
    let path = url_path(url).to_ascii_lowercase();

    if let Some((_, extension)) = path.rsplit_once('.') {
        if NON_TEXT_EXTENSIONS.contains(&extension) {
            return false;
        }
    }

    let trimmed = path.strip_suffix('/').unwrap_or(&path);
    if let Some((_, last_segment)) = trimmed.rsplit_once('/') {
        if NON_CONTENT_SEGMENTS.contains(&last_segment) {
            return false;
        }
    }

    true
}

/// Checks whether a URL contains any text-content indicator
///
/// Matching is a case-insensitive substring search over the whole URL.
pub fn has_text_hint(url: &str) -> bool {
    let lower = url.to_lowercase();
    TEXT_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}

/// Returns the path portion of a URL, or the raw string without its query
/// and fragment when it does not parse
fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
