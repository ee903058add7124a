//! Site-Mapper main entry point
//!
//! This is the command-line interface for the Site-Mapper crawler and its
//! HTTP front end.

use anyhow::Context;
use clap::{Parser, Subcommand};
use site_mapper::config::{load_config_or_default, Config};
use site_mapper::sitemap::map_site;
use site_mapper::url::site_url_from_input;
use site_mapper::Crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Mapper: a bounded single-site crawler
///
/// Site-Mapper discovers the pages of one website, starting from a single
/// URL and staying on its host, up to a page budget.
#[derive(Parser, Debug)]
#[command(name = "site-mapper")]
#[command(version = "1.0.0")]
#[command(about = "A bounded single-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve,

    /// Crawl a site and print the result as JSON
    Crawl {
        /// Domain or URL to crawl, e.g. example.com
        domain: String,

        /// Page budget (overrides the config file)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Number of workers (overrides the config file)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// List a site's pages from its sitemap, crawling when there is none
    Sitemap {
        /// Domain or URL, e.g. example.com
        domain: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from {}", path.display());
    }

    match cli.command {
        Command::Serve => site_mapper::server::serve(config)
            .await
            .context("HTTP server stopped")?,
        Command::Crawl {
            domain,
            max_pages,
            workers,
        } => handle_crawl(&config, &domain, max_pages, workers).await?,
        Command::Sitemap { domain } => handle_sitemap(&config, &domain).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that JSON on stdout stays machine readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mapper=info,warn"),
            1 => EnvFilter::new("site_mapper=debug,info"),
            2 => EnvFilter::new("site_mapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the `crawl` subcommand
async fn handle_crawl(
    config: &Config,
    domain: &str,
    max_pages: Option<usize>,
    workers: Option<usize>,
) -> anyhow::Result<()> {
    let site = site_url_from_input(domain)?;
    let max_pages = max_pages.unwrap_or(config.crawler.max_pages);
    let workers = workers.unwrap_or(config.crawler.max_workers);

    let crawler = Crawler::new(config)?;
    let result = crawler
        .crawl(site.as_str(), max_pages, workers)
        .await
        .with_context(|| format!("Crawl of {} failed", site))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Handles the `sitemap` subcommand
async fn handle_sitemap(config: &Config, domain: &str) -> anyhow::Result<()> {
    let site = site_url_from_input(domain)?;

    let crawler = Crawler::new(config)?;
    let listing = map_site(&crawler, &site, &config.sitemap)
        .await
        .with_context(|| format!("Listing pages of {} failed", site))?;

    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
