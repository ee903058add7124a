//! Crawl engine: runs a pool of workers against one crawl job
//!
//! The engine owns the shared HTTP client and the crawler settings. Each call
//! to [`Crawler::crawl`] creates a fresh [`CrawlJob`], spawns the workers as
//! tokio tasks, waits for the job to finish (or for the overall deadline),
//! and then assembles the report.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::job::{CrawlJob, CrawlResult, Pull, VisitOutcome};
use crate::crawler::{build_http_client, extract_links, fetch_url, page_title, FetchResult};
use crate::url::CrawlTarget;
use crate::SiteMapperError;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Concurrent single-site crawler
#[derive(Debug, Clone)]
pub struct Crawler {
    client: Client,
    settings: CrawlerConfig,
}

impl Crawler {
    /// Creates a crawler with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - Full configuration; the fetcher and crawler sections are used
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(SiteMapperError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, SiteMapperError> {
        let client = build_http_client(&config.fetcher)?;
        Ok(Self::with_client(client, config.crawler.clone()))
    }

    /// Creates a crawler sharing an existing HTTP client
    pub fn with_client(client: Client, settings: CrawlerConfig) -> Self {
        Self { client, settings }
    }

    /// The HTTP client used for every fetch
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Crawls one site starting from `start_url`
    ///
    /// # Arguments
    ///
    /// * `start_url` - Absolute `http`/`https` URL; its netloc is the crawl scope
    /// * `max_pages` - Upper bound on discovered pages
    /// * `max_workers` - Number of concurrent workers (capped by `max_pages`)
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - The report, also when the deadline cut the run short
    /// * `Err(SiteMapperError::Validation)` - Invalid start URL or limits
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_mapper::{Config, Crawler};
    ///
    /// # async fn run() -> site_mapper::Result<()> {
    /// let crawler = Crawler::new(&Config::default())?;
    /// let result = crawler.crawl("https://example.com", 50, 3).await?;
    /// println!("{} pages", result.total_discovered);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(
        &self,
        start_url: &str,
        max_pages: usize,
        max_workers: usize,
    ) -> Result<CrawlResult, SiteMapperError> {
        let job = Arc::new(CrawlJob::new(
            start_url,
            max_pages,
            max_workers,
            Duration::from_millis(self.settings.pull_timeout_ms),
        )?);

        let worker_count = job.worker_count();
        tracing::info!(
            "Starting crawl of {} (max {} pages, {} workers)",
            job.domain(),
            max_pages,
            worker_count
        );

        let started = Instant::now();
        job.seed();

        let courtesy_delay = Duration::from_millis(self.settings.courtesy_delay_ms);
        let handles: Vec<JoinHandle<()>> = (0..worker_count)
            .map(|id| {
                let job = Arc::clone(&job);
                let client = self.client.clone();
                tokio::spawn(run_worker(id, job, client, courtesy_delay))
            })
            .collect();

        let deadline = Duration::from_secs(self.settings.max_duration_secs);
        if tokio::time::timeout(deadline, job.wait_until_done())
            .await
            .is_err()
        {
            tracing::warn!(
                "Crawl of {} exceeded {}s, stopping workers",
                job.domain(),
                self.settings.max_duration_secs
            );
            job.stop();
        }

        self.join_workers(handles).await;

        let result = job.to_result();
        tracing::info!(
            "Crawl of {} complete: {} discovered, {} visited, {} results in {:.2}s",
            result.domain,
            result.total_discovered,
            result.total_visited,
            result.detailed_results.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(result)
    }

    /// Joins every worker, giving each at most the shutdown timeout
    ///
    /// Workers still running after that are detached; their late completions
    /// land in a job nobody reads anymore.
    async fn join_workers(&self, handles: Vec<JoinHandle<()>>) {
        let grace = Duration::from_millis(self.settings.shutdown_timeout_ms);

        for (id, handle) in handles.into_iter().enumerate() {
            match tokio::time::timeout(grace, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!("Worker {} failed: {}", id, e);
                }
                Err(_) => {
                    tracing::warn!(
                        "Worker {} did not stop within {}ms, detaching",
                        id,
                        grace.as_millis()
                    );
                }
            }
        }
    }
}

/// Worker loop: pull, visit, report, pause
async fn run_worker(id: usize, job: Arc<CrawlJob>, client: Client, courtesy_delay: Duration) {
    tracing::debug!("Worker {} started", id);
    let mut visited = 0usize;

    loop {
        match job.pull().await {
            Pull::Target(target) => {
                let outcome = visit(&client, &target, job.domain()).await;
                job.complete(target, outcome);
                visited += 1;

                if job.phase().is_running() && !courtesy_delay.is_zero() {
                    tokio::time::sleep(courtesy_delay).await;
                }
            }
            Pull::Idle => continue,
            Pull::Finished => break,
        }
    }

    tracing::debug!("Worker {} finished after {} pages", id, visited);
}

/// Fetches one target and extracts its title and links
async fn visit(client: &Client, target: &CrawlTarget, domain: &str) -> VisitOutcome {
    tracing::debug!("Fetching {}", target);

    let fetched = fetch_url(client, target.as_str()).await;
    if let FetchResult::Success { final_url, .. } = &fetched {
        if final_url != target.as_str() {
            tracing::debug!("{} redirected to {}", target, final_url);
        }
    }

    let (status_code, body) = match fetched.into_page() {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", target, e);
            return VisitOutcome::Failed(e);
        }
    };

    let title = page_title(&body);
    let links = match target.to_url() {
        Some(base) => extract_links(&body, &base, domain),
        None => Ok(Default::default()),
    };

    if let Err(e) = &links {
        tracing::warn!("Failed to parse HTML for {}: {}", target, e);
    }

    VisitOutcome::Fetched {
        status_code,
        title,
        links,
    }
}

/// Crawls one site with a crawler built from `config`
///
/// # Arguments
///
/// * `config` - Full configuration
/// * `start_url` - Absolute start URL
/// * `max_pages` - Page budget
/// * `max_workers` - Worker count
pub async fn crawl(
    config: &Config,
    start_url: &str,
    max_pages: usize,
    max_workers: usize,
) -> Result<CrawlResult, SiteMapperError> {
    Crawler::new(config)?
        .crawl(start_url, max_pages, max_workers)
        .await
}
