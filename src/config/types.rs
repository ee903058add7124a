use serde::Deserialize;

/// Main configuration structure for Site-Mapper
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub sitemap: SitemapConfig,
}

/// HTTP front end binding
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind (0 picks an ephemeral port)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6000,
        }
    }
}

/// Crawl engine behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Page budget used by the analyze endpoint
    pub max_pages: usize,

    /// Worker count used by the analyze endpoint
    pub max_workers: usize,

    /// Pause between a worker's successive fetches (milliseconds)
    pub courtesy_delay_ms: u64,

    /// How long an idle worker waits on an empty frontier before re-checking
    /// for termination (milliseconds)
    pub pull_timeout_ms: u64,

    /// How long the orchestrator waits for each worker to exit (milliseconds)
    pub shutdown_timeout_ms: u64,

    /// Hard cap on a single crawl's wall time (seconds)
    pub max_duration_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_workers: 3,
            courtesy_delay_ms: 500,
            pull_timeout_ms: 2000,
            shutdown_timeout_ms: 1000,
            max_duration_secs: 120,
        }
    }
}

/// HTTP client settings for page and sitemap requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 5,
            max_redirects: 10,
        }
    }
}

/// Sitemap endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SitemapConfig {
    /// Page budget of the fallback crawl when no sitemap is found
    pub max_pages: usize,

    /// Worker count of the fallback crawl
    pub max_workers: usize,

    /// Maximum number of sitemap URLs returned in a response
    pub max_listed: usize,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            max_pages: 30,
            max_workers: 2,
            max_listed: 100,
        }
    }
}
