use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use super::extract_domain;

/// A normalized URL used as the crawl's deduplication key
///
/// A `CrawlTarget` holds scheme, netloc and path only. Query string and
/// fragment are never part of it, so two links that differ only in those
/// parts collapse to the same target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlTarget(String);

impl CrawlTarget {
    /// Returns the normalized URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the target and returns the normalized URL string
    pub fn into_string(self) -> String {
        self.0
    }

    /// Parses the target back into a `Url`, if it is a well-formed URL
    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CrawlTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a URL into its deduplication key
///
/// # Normalization Steps
///
/// 1. Parse the URL
/// 2. Keep the scheme and the netloc (lowercase host, explicit port)
/// 3. Keep the path; an empty path becomes `/`
/// 4. Drop the query string and the fragment
///
/// Strings that don't parse as host-bearing URLs are passed through with
/// everything from the first `?` or `#` removed; scope filtering rejects
/// them later. The function never fails and is idempotent.
///
/// # Examples
///
/// ```
/// use site_mapper::url::normalize_url;
///
/// let target = normalize_url("https://Example.com/about?ref=nav#team");
/// assert_eq!(target.as_str(), "https://example.com/about");
/// ```
pub fn normalize_url(url_str: &str) -> CrawlTarget {
    if let Ok(url) = Url::parse(url_str) {
        if let Some(netloc) = extract_domain(&url) {
            return CrawlTarget(format!("{}://{}{}", url.scheme(), netloc, url.path()));
        }
    }

    CrawlTarget(strip_query_and_fragment(url_str).to_string())
}

/// Cuts a raw string at the first query or fragment delimiter
fn strip_query_and_fragment(raw: &str) -> &str {
    match raw.find(['?', '#']) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}
