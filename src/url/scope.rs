use url::Url;

use super::extract_domain;

/// Path extensions that never point at a crawlable page
const NON_PAGE_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".ico", ".bmp",
    // Archives
    ".zip", ".gz", ".tar", ".rar", ".7z",
    // Stylesheets and scripts
    ".css", ".js",
    // Documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // Media
    ".mp3", ".mp4", ".avi", ".mov",
];

/// Link prefixes that can never be fetched as a page
const NON_FETCHABLE_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Decides whether a URL belongs to the crawled site and looks like a page
///
/// The rules are applied in order:
///
/// 1. The candidate's netloc must equal `domain` exactly (subdomains are
///    different sites)
/// 2. The path must not end with a binary asset extension
/// 3. The scheme must be `http` or `https`; `mailto:`, `tel:` and friends
///    are rejected
///
/// Anything that fails to parse is out of scope.
///
/// # Examples
///
/// ```
/// use site_mapper::url::is_in_scope;
///
/// assert!(is_in_scope("https://example.com/about", "example.com"));
/// assert!(!is_in_scope("https://blog.example.com/", "example.com"));
/// assert!(!is_in_scope("https://example.com/logo.png", "example.com"));
/// assert!(!is_in_scope("mailto:hi@example.com", "example.com"));
/// ```
pub fn is_in_scope(candidate: &str, domain: &str) -> bool {
    let url = match Url::parse(candidate) {
        Ok(url) => url,
        Err(_) => return false,
    };

    match extract_domain(&url) {
        Some(netloc) if netloc == domain => {}
        _ => return false,
    }

    if has_non_page_extension(url.path()) {
        return false;
    }

    is_fetchable_scheme(&url, candidate)
}

fn has_non_page_extension(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    NON_PAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn is_fetchable_scheme(url: &Url, raw: &str) -> bool {
    let lowered = raw.trim_start().to_ascii_lowercase();
    if NON_FETCHABLE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return false;
    }

    matches!(url.scheme(), "http" | "https")
}
