//! Sitemap shortcut
//!
//! Before crawling a site, its `/sitemap.xml` is tried. A flat `<urlset>`
//! (or any document with `<loc>` elements) answers the question directly;
//! otherwise the caller falls back to a small crawl.

use crate::config::SitemapConfig;
use crate::crawler::{fetch_url, CrawlResult, Crawler};
use crate::SiteMapperError;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use serde::Serialize;
use url::Url;

/// Value of the `source` field in sitemap responses
pub const SITEMAP_SOURCE: &str = "sitemap.xml";

/// Pages listed in a site's sitemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapResult {
    /// Site base URL the sitemap was fetched for
    pub domain: String,

    /// Number of `<loc>` entries in the document
    pub total_pages: usize,

    /// Always `"sitemap.xml"`
    pub source: &'static str,

    /// The first `max_listed` locations, in document order
    pub pages: Vec<String>,
}

/// Either the sitemap listing or the crawl it fell back to
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SiteMap {
    Sitemap(SitemapResult),
    Crawl(CrawlResult),
}

/// Returns the sitemap location for a site base URL
pub fn sitemap_url(base: &Url) -> Option<Url> {
    base.join("/sitemap.xml").ok()
}

/// Extracts the text of every `<loc>` element, in document order
///
/// Namespace prefixes are ignored. Parsing stops quietly at the first
/// malformed construct, keeping what was read so far.
pub fn parse_sitemap(xml: &str) -> Vec<String> {
    let mut locations = Vec::new();
    let mut in_loc = false;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                in_loc = e.local_name().as_ref() == b"loc";
            }
            Ok(Event::Text(ref e)) if in_loc => {
                let text = e.unescape().unwrap_or_default();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    locations.push(trimmed.to_string());
                }
            }
            Ok(Event::CData(ref e)) if in_loc => {
                let text = String::from_utf8_lossy(e);
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    locations.push(trimmed.to_string());
                }
            }
            Ok(Event::End(_)) => in_loc = false,
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Stopped reading sitemap: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    locations
}

/// Fetches and parses `<base>/sitemap.xml`
///
/// # Returns
///
/// * `Some(SitemapResult)` - The sitemap answered 200 and listed at least one page
/// * `None` - Any other status, a network failure, or an empty document
pub async fn fetch_sitemap(
    client: &Client,
    base: &Url,
    max_listed: usize,
) -> Option<SitemapResult> {
    let location = sitemap_url(base)?;
    tracing::debug!("Fetching sitemap {}", location);

    let (_, body) = match fetch_url(client, location.as_str()).await.into_page() {
        Ok(page) => page,
        Err(e) => {
            tracing::info!("No sitemap at {}: {}", location, e);
            return None;
        }
    };

    let locations = parse_sitemap(&body);
    if locations.is_empty() {
        tracing::info!("Sitemap at {} lists no pages", location);
        return None;
    }

    let total_pages = locations.len();
    let pages = locations.into_iter().take(max_listed).collect();

    Some(SitemapResult {
        domain: base.as_str().trim_end_matches('/').to_string(),
        total_pages,
        source: SITEMAP_SOURCE,
        pages,
    })
}

/// Lists a site's pages from its sitemap, crawling when there is none
///
/// # Arguments
///
/// * `crawler` - Crawler used for both the sitemap fetch and the fallback crawl
/// * `base` - Site base URL
/// * `settings` - Listing limit and fallback crawl size
pub async fn map_site(
    crawler: &Crawler,
    base: &Url,
    settings: &SitemapConfig,
) -> Result<SiteMap, SiteMapperError> {
    if let Some(sitemap) = fetch_sitemap(crawler.client(), base, settings.max_listed).await {
        tracing::info!(
            "Sitemap for {} lists {} pages",
            sitemap.domain,
            sitemap.total_pages
        );
        return Ok(SiteMap::Sitemap(sitemap));
    }

    tracing::info!("Falling back to crawling {}", base);
    let result = crawler
        .crawl(base.as_str(), settings.max_pages, settings.max_workers)
        .await?;
    Ok(SiteMap::Crawl(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_url() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        assert_eq!(
            sitemap_url(&base).unwrap().as_str(),
            "https://example.com/sitemap.xml"
        );
    }

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://example.com/</loc><lastmod>2024-01-01</lastmod></url>
              <url><loc> https://example.com/about </loc></url>
            </urlset>"#;

        assert_eq!(
            parse_sitemap(xml),
            vec!["https://example.com/", "https://example.com/about"]
        );
    }

    #[test]
    fn test_parse_prefixed_and_escaped_locations() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
              <sm:url><sm:loc>https://example.com/?a=1&amp;b=2</sm:loc></sm:url>
              <sm:url><sm:loc><![CDATA[https://example.com/cdata]]></sm:loc></sm:url>
            </sm:urlset>"#;

        assert_eq!(
            parse_sitemap(xml),
            vec!["https://example.com/?a=1&b=2", "https://example.com/cdata"]
        );
    }

    #[test]
    fn test_parse_ignores_other_text() {
        let xml = r#"<urlset><url><lastmod>2024</lastmod><priority>0.5</priority></url></urlset>"#;
        assert!(parse_sitemap(xml).is_empty());
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        assert!(parse_sitemap("<html><body>Not found</body></html>").is_empty());
        assert!(parse_sitemap("").is_empty());
    }

    #[test]
    fn test_sitemap_result_serializes() {
        let result = SitemapResult {
            domain: "https://example.com".to_string(),
            total_pages: 1,
            source: SITEMAP_SOURCE,
            pages: vec!["https://example.com/".to_string()],
        };

        let json = serde_json::to_value(SiteMap::Sitemap(result)).unwrap();
        assert_eq!(json["source"], "sitemap.xml");
        assert_eq!(json["total_pages"], 1);
        assert_eq!(json["domain"], "https://example.com");
    }
}
