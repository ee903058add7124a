//! Turning user-typed domains into crawlable site URLs

use crate::SiteMapperError;
use url::Url;

/// Message returned when no domain was given
pub const EMPTY_DOMAIN: &str = "Please enter a domain";

/// Message returned when the domain can't be turned into a URL with a host
pub const INVALID_DOMAIN: &str = "Invalid domain";

/// Converts user input such as `example.com` into a site URL
///
/// Surrounding whitespace is ignored. Input without an `http://` or
/// `https://` prefix is treated as an `https` site.
///
/// # Returns
///
/// * `Ok(Url)` - An absolute URL with a host
/// * `Err(SiteMapperError::Validation)` - Empty input, or no usable host
///
/// # Example
///
/// ```
/// use site_mapper::url::site_url_from_input;
///
/// let url = site_url_from_input("  example.com ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn site_url_from_input(input: &str) -> Result<Url, SiteMapperError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SiteMapperError::Validation(EMPTY_DOMAIN.to_string()));
    }

    let candidate = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(SiteMapperError::Validation(INVALID_DOMAIN.to_string())),
    }
}
