use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_mapper::config::load_config;
///
/// let config = load_config(Path::new("site-mapper.toml")).unwrap();
/// println!("Page budget: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration file if one was given, otherwise the defaults
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[server]
host = "127.0.0.1"
port = 8080

[crawler]
max-pages = 20
max-workers = 4
courtesy-delay-ms = 100
pull-timeout-ms = 500
shutdown-timeout-ms = 250
max-duration-secs = 30

[fetcher]
user-agent = "TestAgent/1.0"
timeout-secs = 3
max-redirects = 5

[sitemap]
max-pages = 10
max-workers = 1
max-listed = 25
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.crawler.max_pages, 20);
        assert_eq!(config.crawler.max_workers, 4);
        assert_eq!(config.crawler.courtesy_delay_ms, 100);
        assert_eq!(config.fetcher.user_agent, "TestAgent/1.0");
        assert_eq!(config.fetcher.max_redirects, 5);
        assert_eq!(config.sitemap.max_listed, 25);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = create_temp_config("[crawler]\nmax-pages = 7\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 7);
        assert_eq!(config.crawler.max_workers, 3);
        assert_eq!(config.crawler.courtesy_delay_ms, 500);
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.fetcher.timeout_secs, 5);
        assert_eq!(config.sitemap.max_pages, 30);
        assert_eq!(config.sitemap.max_workers, 2);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.max_pages, 50);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/site-mapper.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-workers = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.crawler.max_workers, 3);
    }
}
