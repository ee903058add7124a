//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the identifying user agent and timeout
//! - GET requests with redirect following
//! - Classifying the outcome into success, HTTP error, or network error

use crate::config::FetcherConfig;
use crate::FetchError;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Server answered 200 OK
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with any other status; the body is discarded
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, redirect overflow, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the client timeout
        timed_out: bool,
    },
}

impl FetchResult {
    /// Splits the outcome into the fetched page or the reason it failed
    ///
    /// # Returns
    ///
    /// * `Ok((status_code, body))` - The server answered 200 OK
    /// * `Err(FetchError)` - Any other status, a timeout, or a network failure
    pub fn into_page(self) -> Result<(u16, String), FetchError> {
        match self {
            Self::Success {
                status_code, body, ..
            } => Ok((status_code, body)),
            Self::HttpError { status_code } => Err(FetchError::Status(status_code)),
            Self::NetworkError {
                timed_out: true, ..
            } => Err(FetchError::Timeout),
            Self::NetworkError { error, .. } => Err(FetchError::Network(error)),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_mapper::config::FetcherConfig;
/// use site_mapper::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | Success with body |
/// | Any other status | HttpError, body discarded |
/// | Timeout | NetworkError (timed_out) |
/// | Connection / redirect / body read failure | NetworkError |
///
/// No retries are made; the caller decides what a failure means.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: "Connection refused".to_string(),
            timed_out: false,
        }
    } else if e.is_redirect() {
        FetchResult::NetworkError {
            error: "Too many redirects".to_string(),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetcherConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_success_into_page() {
        let result = FetchResult::Success {
            final_url: "https://example.com/".to_string(),
            status_code: 200,
            body: "<html></html>".to_string(),
        };
        assert_eq!(result.into_page(), Ok((200, "<html></html>".to_string())));
    }

    #[test]
    fn test_http_error_maps_to_status() {
        let result = FetchResult::HttpError { status_code: 404 };
        assert_eq!(result.into_page(), Err(FetchError::Status(404)));
    }

    #[test]
    fn test_timeout_maps_to_timeout() {
        let result = FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        };
        assert_eq!(result.into_page(), Err(FetchError::Timeout));
    }

    #[test]
    fn test_network_error_keeps_description() {
        let result = FetchResult::NetworkError {
            error: "Connection refused".to_string(),
            timed_out: false,
        };
        assert_eq!(
            result.into_page(),
            Err(FetchError::Network("Connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = build_http_client(&FetcherConfig {
            timeout_secs: 1,
            ..FetcherConfig::default()
        })
        .unwrap();

        // Port 9 (discard) on localhost is closed in test environments
        let result = fetch_url(&client, "http://127.0.0.1:9/").await;
        assert!(matches!(result, FetchResult::NetworkError { .. }));
    }
}
