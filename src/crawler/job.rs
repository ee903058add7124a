//! Crawl job: the shared, mutable state of one crawl run
//!
//! All cross-worker mutation goes through the job's single mutex: pulling
//! from the frontier, marking a target visited, appending a page result and
//! scheduling newly found links. Each of these is one critical section, and
//! the lock is never held across an `.await`.
//!
//! Workers that find the frontier empty wait on the job's wakeup signal for
//! at most the pull timeout and then re-check, so they always notice the end
//! of the crawl within a bounded interval.

use crate::config::MAX_WORKERS;
use crate::state::CrawlPhase;
use crate::url::{extract_domain, normalize_url, CrawlTarget};
use crate::{FetchError, ParseError, SiteMapperError};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use url::Url;

/// Metadata recorded for every page fetched with HTTP 200
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    /// The page's crawl target
    pub url: CrawlTarget,

    /// HTTP status code of the fetch
    pub status: u16,

    /// Page title, or the untitled sentinel
    pub title: String,
}

/// Final report of a crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// Netloc the crawl was restricted to
    pub domain: String,

    /// Number of distinct pages discovered (scheduled or visited)
    #[serde(rename = "total_pages")]
    pub total_discovered: usize,

    /// Number of pages a fetch was attempted for
    #[serde(rename = "visited_pages")]
    pub total_visited: usize,

    /// Every discovered page, sorted
    pub pages: Vec<CrawlTarget>,

    /// One entry per successfully fetched page, in completion order
    pub detailed_results: Vec<PageResult>,
}

/// What happened when a worker processed one target
#[derive(Debug)]
pub enum VisitOutcome {
    /// The page answered 200 OK
    Fetched {
        status_code: u16,
        title: String,
        /// In-scope links found on the page, or why extraction failed
        links: Result<HashSet<CrawlTarget>, ParseError>,
    },

    /// The fetch failed; the target still counts as visited
    Failed(FetchError),
}

/// Result of a worker's attempt to get work
#[derive(Debug, PartialEq, Eq)]
pub enum Pull {
    /// A target to fetch; the worker must report back with `complete`
    Target(CrawlTarget),

    /// Nothing available right now; re-check later
    Idle,

    /// The crawl is over; the worker should exit
    Finished,
}

/// Everything guarded by the job's mutex
#[derive(Debug)]
struct JobState {
    phase: CrawlPhase,
    discovered: HashSet<CrawlTarget>,
    visited: HashSet<CrawlTarget>,
    frontier: super::frontier::Frontier,
    results: Vec<PageResult>,
}

impl JobState {
    fn transition(&mut self, next: CrawlPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            return false;
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        true
    }
}

/// The mutable state of one crawl run, shared by all of its workers
#[derive(Debug)]
pub struct CrawlJob {
    start_url: Url,
    domain: String,
    max_pages: usize,
    max_workers: usize,
    pull_timeout: Duration,
    state: Mutex<JobState>,
    wakeup: Notify,
}

impl CrawlJob {
    /// Creates a job for one crawl run
    ///
    /// # Arguments
    ///
    /// * `start_url` - Absolute `http`/`https` URL the crawl starts from
    /// * `max_pages` - Page budget (at least 1)
    /// * `max_workers` - Requested worker count (1 to `MAX_WORKERS`)
    /// * `pull_timeout` - Upper bound on one idle wait for work
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlJob)` - Job in the `Seeding` phase
    /// * `Err(SiteMapperError::Validation)` - Invalid start URL or limits
    pub fn new(
        start_url: &str,
        max_pages: usize,
        max_workers: usize,
        pull_timeout: Duration,
    ) -> Result<Self, SiteMapperError> {
        let start = Url::parse(start_url).map_err(|e| {
            SiteMapperError::Validation(format!("Invalid start URL '{}': {}", start_url, e))
        })?;

        if !matches!(start.scheme(), "http" | "https") {
            return Err(SiteMapperError::Validation(format!(
                "Start URL must use http or https, got '{}'",
                start.scheme()
            )));
        }

        let domain = extract_domain(&start).ok_or_else(|| {
            SiteMapperError::Validation(format!("Start URL '{}' has no host", start_url))
        })?;

        if max_pages < 1 {
            return Err(SiteMapperError::Validation(
                "max_pages must be at least 1".to_string(),
            ));
        }

        if !(1..=MAX_WORKERS).contains(&max_workers) {
            return Err(SiteMapperError::Validation(format!(
                "max_workers must be between 1 and {}, got {}",
                MAX_WORKERS, max_workers
            )));
        }

        Ok(Self {
            start_url: start,
            domain,
            max_pages,
            max_workers,
            pull_timeout,
            state: Mutex::new(JobState {
                phase: CrawlPhase::Seeding,
                discovered: HashSet::new(),
                visited: HashSet::new(),
                frontier: super::frontier::Frontier::new(),
                results: Vec::new(),
            }),
            wakeup: Notify::new(),
        })
    }

    /// Netloc the crawl is restricted to
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Number of workers to run: never more than the page budget
    pub fn worker_count(&self) -> usize {
        self.max_workers.min(self.max_pages)
    }

    /// Current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        self.lock().phase
    }

    /// Places the normalized start URL on the frontier and starts the run
    pub fn seed(&self) {
        let mut state = self.lock();
        if state.phase != CrawlPhase::Seeding {
            return;
        }

        let seed = normalize_url(self.start_url.as_str());
        tracing::debug!("Seeding frontier with {}", seed);
        state.discovered.insert(seed.clone());
        state.frontier.push(seed);
        state.transition(CrawlPhase::Running);
    }

    /// Hands the next unvisited target to a worker
    ///
    /// Targets are only handed out while the run is `Running`. Once the page
    /// budget is reached every caller gets `Pull::Finished`, even if targets
    /// are still queued. If the frontier is empty but other workers still
    /// hold targets, the caller waits for a wakeup or the pull timeout,
    /// whichever comes first, and gets `Pull::Idle`. If the frontier is empty
    /// and nothing is in flight, the crawl moves to `Done`.
    pub async fn pull(&self) -> Pull {
        let notified = self.wakeup.notified();
        tokio::pin!(notified);
        // Register before inspecting state so a concurrent notify isn't lost
        notified.as_mut().enable();

        {
            let mut guard = self.lock();
            let state = &mut *guard;

            if !state.phase.is_running() {
                return Pull::Finished;
            }

            loop {
                let seen = match state.frontier.peek() {
                    Some(next) => state.visited.contains(next),
                    None => break,
                };
                if !seen {
                    break;
                }
                if let Some(skipped) = state.frontier.discard_next() {
                    tracing::trace!("Skipping already visited {}", skipped);
                }
            }

            if let Some(target) = state.frontier.take() {
                return Pull::Target(target);
            }

            if state.frontier.is_exhausted() {
                state.transition(CrawlPhase::Done);
                drop(guard);
                self.wakeup.notify_waiters();
                return Pull::Finished;
            }
        }

        let _ = tokio::time::timeout(self.pull_timeout, notified).await;
        Pull::Idle
    }

    /// Records the outcome of a target handed out by `pull`
    ///
    /// In one critical section this marks the target visited, appends its
    /// page result, and schedules every new link while the budget allows.
    /// Links found after the budget is reached are dropped. Returns the
    /// number of newly scheduled targets.
    pub fn complete(&self, target: CrawlTarget, outcome: VisitOutcome) -> usize {
        let mut scheduled = 0;
        let mut guard = self.lock();
        let state = &mut *guard;

        state.frontier.complete();
        state.visited.insert(target.clone());

        match outcome {
            VisitOutcome::Fetched {
                status_code,
                title,
                links,
            } => {
                state.results.push(PageResult {
                    url: target.clone(),
                    status: status_code,
                    title,
                });

                match links {
                    Ok(links) => {
                        let mut links: Vec<CrawlTarget> = links.into_iter().collect();
                        links.sort();

                        let mut dropped = 0;
                        for link in links {
                            if state.discovered.contains(&link) {
                                continue;
                            }
                            if !state.phase.accepts_new_targets()
                                || state.discovered.len() >= self.max_pages
                            {
                                dropped += 1;
                                continue;
                            }
                            debug_assert!(!state.frontier.contains(&link));
                            state.discovered.insert(link.clone());
                            state.frontier.push(link);
                            scheduled += 1;
                        }

                        if dropped > 0 {
                            tracing::debug!(
                                "Dropped {} links from {}: {}",
                                dropped,
                                target,
                                drop_reason(state.phase)
                            );
                        }
                    }
                    Err(e) => {
                        tracing::debug!("No links extracted from {}: {}", target, e);
                    }
                }
            }
            VisitOutcome::Failed(e) => {
                tracing::debug!("Visited {} without result: {}", target, e);
            }
        }

        if state.discovered.len() >= self.max_pages && state.transition(CrawlPhase::Draining) {
            tracing::info!(
                "Page budget of {} reached for {}, {} queued pages skipped",
                self.max_pages,
                self.domain,
                state.frontier.len()
            );
        }

        let finished = match state.phase {
            CrawlPhase::Running => state.frontier.is_exhausted(),
            CrawlPhase::Draining => state.frontier.in_flight() == 0,
            _ => false,
        };
        if finished {
            state.transition(CrawlPhase::Done);
        }

        drop(guard);
        self.wakeup.notify_waiters();
        scheduled
    }

    /// Ends the run early; workers exit after their current target
    pub fn stop(&self) {
        let mut state = self.lock();
        if !state.phase.is_terminal() {
            tracing::info!("Stopping crawl of {} in phase {}", self.domain, state.phase);
            state.phase = CrawlPhase::Done;
        }
        drop(state);
        self.wakeup.notify_waiters();
    }

    /// Waits until the run reaches `Done`
    pub async fn wait_until_done(&self) {
        loop {
            let notified = self.wakeup.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.phase().is_terminal() {
                return;
            }

            let _ = tokio::time::timeout(self.pull_timeout, notified).await;
        }
    }

    /// Assembles the report from the current state
    pub fn to_result(&self) -> CrawlResult {
        let state = self.lock();

        let mut pages: Vec<CrawlTarget> = state.discovered.iter().cloned().collect();
        pages.sort();

        CrawlResult {
            domain: self.domain.clone(),
            total_discovered: state.discovered.len(),
            total_visited: state.visited.len(),
            pages,
            detailed_results: state.results.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Why newly found links can't be scheduled in `phase`
fn drop_reason(phase: CrawlPhase) -> &'static str {
    if phase.is_terminal() {
        "crawl stopped"
    } else {
        "page budget reached"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(max_pages: usize, max_workers: usize) -> CrawlJob {
        CrawlJob::new(
            "https://example.com/",
            max_pages,
            max_workers,
            Duration::from_millis(20),
        )
        .unwrap()
    }

    fn target(path: &str) -> CrawlTarget {
        normalize_url(&format!("https://example.com{}", path))
    }

    fn fetched(links: &[&str]) -> VisitOutcome {
        VisitOutcome::Fetched {
            status_code: 200,
            title: "Title".to_string(),
            links: Ok(links.iter().map(|l| target(l)).collect()),
        }
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        let timeout = Duration::from_millis(10);
        assert!(CrawlJob::new("not a url", 10, 1, timeout).is_err());
        assert!(CrawlJob::new("ftp://example.com/", 10, 1, timeout).is_err());
        assert!(CrawlJob::new("https://example.com/", 0, 1, timeout).is_err());
        assert!(CrawlJob::new("https://example.com/", 10, 0, timeout).is_err());
        assert!(CrawlJob::new("https://example.com/", 10, MAX_WORKERS + 1, timeout).is_err());
    }

    #[test]
    fn test_domain_and_worker_count() {
        let job = job(2, 5);
        assert_eq!(job.domain(), "example.com");
        assert_eq!(job.worker_count(), 2);
        assert_eq!(job.phase(), CrawlPhase::Seeding);
    }

    #[test]
    fn test_seed_normalizes_start_url() {
        let job = CrawlJob::new(
            "https://example.com?x=1#top",
            10,
            1,
            Duration::from_millis(10),
        )
        .unwrap();
        job.seed();

        let result = job.to_result();
        assert_eq!(result.pages, vec![target("/")]);
        assert_eq!(job.phase(), CrawlPhase::Running);
    }

    #[tokio::test]
    async fn test_budget_of_one_finishes_after_start_page() {
        let job = job(1, 3);
        job.seed();
        assert_eq!(job.phase(), CrawlPhase::Running);

        assert_eq!(job.pull().await, Pull::Target(target("/")));
        assert_eq!(job.complete(target("/"), fetched(&["/a"])), 0);

        assert_eq!(job.phase(), CrawlPhase::Done);
        assert_eq!(job.pull().await, Pull::Finished);
        assert_eq!(job.to_result().total_discovered, 1);
    }

    #[tokio::test]
    async fn test_pull_then_complete_schedules_links() {
        let job = job(10, 1);
        job.seed();

        let pulled = job.pull().await;
        assert_eq!(pulled, Pull::Target(target("/")));

        let scheduled = job.complete(target("/"), fetched(&["/about", "/contact"]));
        assert_eq!(scheduled, 2);

        let result = job.to_result();
        assert_eq!(result.total_discovered, 3);
        assert_eq!(result.total_visited, 1);
        assert_eq!(result.detailed_results.len(), 1);
    }

    #[tokio::test]
    async fn test_known_links_not_rescheduled() {
        let job = job(10, 1);
        job.seed();

        let _ = job.pull().await;
        assert_eq!(job.complete(target("/"), fetched(&["/", "/a"])), 1);

        let _ = job.pull().await;
        assert_eq!(job.complete(target("/a"), fetched(&["/", "/a"])), 0);

        assert_eq!(job.to_result().total_discovered, 2);
    }

    #[tokio::test]
    async fn test_budget_caps_discovery_and_drops_rest() {
        let job = job(3, 1);
        job.seed();

        let _ = job.pull().await;
        let scheduled = job.complete(target("/"), fetched(&["/a", "/b", "/c", "/d"]));
        assert_eq!(scheduled, 2);

        // Nothing in flight, so reaching the budget ends the run at once
        assert_eq!(job.phase(), CrawlPhase::Done);
        assert_eq!(job.pull().await, Pull::Finished);

        let result = job.to_result();
        assert_eq!(result.total_discovered, 3);
        assert_eq!(result.total_visited, 1);
        assert_eq!(result.pages, vec![target("/"), target("/a"), target("/b")]);
    }

    #[tokio::test]
    async fn test_reaching_budget_stops_handing_out_targets() {
        let job = job(4, 2);
        job.seed();

        let _ = job.pull().await;
        assert_eq!(job.complete(target("/"), fetched(&["/a", "/b"])), 2);

        assert_eq!(job.pull().await, Pull::Target(target("/a")));
        assert_eq!(job.pull().await, Pull::Target(target("/b")));

        // "/c" takes the last slot, "/d" is dropped
        assert_eq!(job.complete(target("/a"), fetched(&["/c", "/d"])), 1);
        assert_eq!(job.phase(), CrawlPhase::Draining);

        // "/c" is queued but no longer handed out
        assert_eq!(job.pull().await, Pull::Finished);

        // The in-flight "/b" still completes and is recorded
        job.complete(target("/b"), fetched(&["/e"]));
        assert_eq!(job.phase(), CrawlPhase::Done);

        let result = job.to_result();
        assert_eq!(result.total_discovered, 4);
        assert_eq!(result.total_visited, 3);
        assert_eq!(result.detailed_results.len(), 3);
        assert!(!result.pages.contains(&target("/e")));
    }

    #[tokio::test]
    async fn test_stopped_job_drops_new_links() {
        let job = job(10, 1);
        job.seed();

        let _ = job.pull().await;
        job.stop();

        assert_eq!(job.complete(target("/"), fetched(&["/a"])), 0);
        assert_eq!(job.phase(), CrawlPhase::Done);

        let result = job.to_result();
        assert_eq!(result.total_discovered, 1);
        assert_eq!(result.total_visited, 1);
    }

    #[test]
    fn test_drop_reason_names_cause() {
        assert_eq!(drop_reason(CrawlPhase::Done), "crawl stopped");
        assert_eq!(drop_reason(CrawlPhase::Draining), "page budget reached");
        assert_eq!(drop_reason(CrawlPhase::Running), "page budget reached");
    }

    #[tokio::test]
    async fn test_failed_visit_counts_without_result() {
        let job = job(10, 1);
        job.seed();

        let _ = job.pull().await;
        job.complete(target("/"), VisitOutcome::Failed(FetchError::Timeout));

        let result = job.to_result();
        assert_eq!(result.total_visited, 1);
        assert!(result.detailed_results.is_empty());
        assert_eq!(job.phase(), CrawlPhase::Done);
    }

    #[tokio::test]
    async fn test_parse_error_records_page_without_links() {
        let job = job(10, 1);
        job.seed();

        let _ = job.pull().await;
        job.complete(
            target("/"),
            VisitOutcome::Fetched {
                status_code: 200,
                title: "Home".to_string(),
                links: Err(ParseError::Selector("bad".to_string())),
            },
        );

        let result = job.to_result();
        assert_eq!(result.detailed_results.len(), 1);
        assert_eq!(result.total_discovered, 1);
    }

    #[tokio::test]
    async fn test_idle_while_other_worker_in_flight() {
        let job = job(10, 2);
        job.seed();

        assert_eq!(job.pull().await, Pull::Target(target("/")));
        // Frontier empty, but "/" is still in flight
        assert_eq!(job.pull().await, Pull::Idle);
        assert_eq!(job.phase(), CrawlPhase::Running);

        job.complete(target("/"), fetched(&[]));
        assert_eq!(job.pull().await, Pull::Finished);
    }

    #[tokio::test]
    async fn test_stop_finishes_pulls() {
        let job = job(10, 1);
        job.seed();
        job.stop();

        assert_eq!(job.phase(), CrawlPhase::Done);
        assert_eq!(job.pull().await, Pull::Finished);
    }

    #[tokio::test]
    async fn test_wait_until_done_returns_after_completion() {
        let job = std::sync::Arc::new(job(10, 1));
        job.seed();

        let waiter = {
            let job = job.clone();
            tokio::spawn(async move { job.wait_until_done().await })
        };

        let _ = job.pull().await;
        job.complete(target("/"), fetched(&[]));

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter did not finish")
            .unwrap();
    }

    #[test]
    fn test_result_serializes_with_wire_names() {
        let job = job(10, 1);
        job.seed();

        let json = serde_json::to_value(job.to_result()).unwrap();
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["total_pages"], 1);
        assert_eq!(json["visited_pages"], 0);
        assert_eq!(json["pages"][0], "https://example.com/");
        assert!(json["detailed_results"].as_array().unwrap().is_empty());
    }
}
