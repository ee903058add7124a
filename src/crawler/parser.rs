//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - In-scope crawl targets (from `<a href>` and `<link href>` elements)
//! - Page title

use crate::url::{is_in_scope, normalize_url, CrawlTarget};
use crate::ParseError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Title recorded for pages without a usable `<title>`
pub const UNTITLED: &str = "Untitled";

/// How many characters of the body are scanned for the title
const TITLE_SCAN_CHARS: usize = 1000;

/// Extracts every in-scope crawl target linked from a page
///
/// # Link Extraction Rules
///
/// - Every `<a href>` and `<link href>` element is considered
/// - The href is resolved against `base_url`, then normalized
/// - The result is kept only if it passes the scope filter for `domain`
/// - Duplicates collapse
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page's own URL, used to resolve relative links
/// * `domain` - The netloc the crawl is restricted to
///
/// # Example
///
/// ```
/// use site_mapper::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/about#team">About</a><a href="https://other.com/">x</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base, "example.com").unwrap();
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_links(
    html: &str,
    base_url: &Url,
    domain: &str,
) -> Result<HashSet<CrawlTarget>, ParseError> {
    let selector = Selector::parse("a[href], link[href]")
        .map_err(|e| ParseError::Selector(format!("{:?}", e)))?;

    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(target) = resolve_link(href, base_url, domain) {
            links.insert(target);
        }
    }

    Ok(links)
}

/// Resolves an href to an in-scope crawl target
///
/// Returns None for empty hrefs, hrefs that don't resolve, and anything the
/// scope filter rejects.
fn resolve_link(href: &str, base_url: &Url, domain: &str) -> Option<CrawlTarget> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    let target = normalize_url(absolute.as_str());

    if is_in_scope(target.as_str(), domain) {
        Some(target)
    } else {
        None
    }
}

/// Extracts the page title from the beginning of the document
///
/// Only the first 1000 characters are parsed. The first `<title>` element's
/// text is trimmed; an empty title counts as absent.
pub fn extract_title(html: &str) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(body_prefix(html));

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns the page title, or the `UNTITLED` sentinel
pub fn page_title(html: &str) -> String {
    extract_title(html).unwrap_or_else(|| UNTITLED.to_string())
}

fn body_prefix(html: &str) -> &str {
    match html.char_indices().nth(TITLE_SCAN_CHARS) {
        Some((idx, _)) => &html[..idx],
        None => html,
    }
}
