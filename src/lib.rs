//! Site-Mapper: a bounded single-site crawler
//!
//! This crate discovers every reachable page of one website, starting from a
//! single URL, up to a page budget. Workers share one frontier and one result
//! set; the result is the sorted list of discovered URLs plus per-page status
//! and title. An HTTP front end exposes the crawl and a sitemap shortcut.

pub mod config;
pub mod crawler;
pub mod server;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Mapper operations
#[derive(Debug, Error)]
pub enum SiteMapperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl request: {0}")]
    Validation(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Why a single page could not be turned into a result
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),
}

/// HTML extraction errors; the crawl treats these as "no links found"
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Result type alias for Site-Mapper operations
pub type Result<T> = std::result::Result<T, SiteMapperError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, Crawler, PageResult};
pub use state::CrawlPhase;
pub use url::{extract_domain, is_in_scope, normalize_url, CrawlTarget};
