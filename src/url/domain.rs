use url::Url;

/// Extracts the site key (netloc) from a URL
///
/// This is the lowercase host, followed by `:port` when the URL carries an
/// explicit non-default port. Default ports are dropped by the parser, so
/// `https://example.com:443/` and `https://example.com/` share one key.
/// If the URL has no host (e.g. `mailto:`), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mapper::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
