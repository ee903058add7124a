//! Crawler module for discovering the pages of one site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeout and redirect handling
//! - HTML parsing for links and titles
//! - The shared frontier and per-run crawl job
//! - The worker pool that ties them together

mod engine;
mod fetcher;
mod frontier;
mod job;
mod parser;

pub use engine::{crawl, Crawler};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::Frontier;
pub use job::{CrawlJob, CrawlResult, PageResult, Pull, VisitOutcome};
pub use parser::{extract_links, extract_title, page_title, UNTITLED};
