use url::{Host, Url};

/// Schemes accepted as crawlable URLs
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Checks whether a string is a well-formed absolute URL
///
/// A URL is valid when it parses, uses a web or ftp scheme, and names a host
/// that is either an IP address or a dotted domain with an alphabetic
/// top-level label. Any malformed input yields `false`.
///
/// # Examples
///
/// ```
/// use corpus_crawler::url::is_syntactically_valid;
///
/// assert!(is_syntactically_valid("https://example.com/blog/my-post"));
/// assert!(!is_syntactically_valid("not a url"));
/// assert!(!is_syntactically_valid("https://localhost/"));
/// ```
pub fn is_syntactically_valid(url: &str) -> bool {
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return false;
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

fn is_valid_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });
    if !labels_ok {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.starts_with("xn--") || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}
