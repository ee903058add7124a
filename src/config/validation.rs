use crate::config::types::{Config, CrawlerConfig, FetcherConfig, ServerConfig, SitemapConfig};
use crate::ConfigError;

/// Upper bound on workers per crawl
pub const MAX_WORKERS: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_sitemap_config(&config.sitemap)?;
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("server host cannot be empty".to_string()));
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_budget("crawler.max_pages", config.max_pages)?;
    validate_workers("crawler.max_workers", config.max_workers)?;

    if config.pull_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "pull_timeout_ms must be >= 1ms, got {}ms",
            config.pull_timeout_ms
        )));
    }

    if config.shutdown_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "shutdown_timeout_ms must be >= 1ms, got {}ms",
            config.shutdown_timeout_ms
        )));
    }

    if config.max_duration_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "max_duration_secs must be >= 1s, got {}s",
            config.max_duration_secs
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1s, got {}s",
            config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    validate_budget("sitemap.max_pages", config.max_pages)?;
    validate_workers("sitemap.max_workers", config.max_workers)?;

    if config.max_listed < 1 {
        return Err(ConfigError::Validation(format!(
            "sitemap.max_listed must be >= 1, got {}",
            config.max_listed
        )));
    }

    Ok(())
}

fn validate_budget(name: &str, value: usize) -> Result<(), ConfigError> {
    if value < 1 {
        return Err(ConfigError::Validation(format!(
            "{} must be >= 1, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_workers(name: &str, value: usize) -> Result<(), ConfigError> {
    if value < 1 || value > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_WORKERS, value
        )));
    }
    Ok(())
}
