//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the lifecycle of one crawl run (seeding, running, draining, done)

mod crawl_phase;

// Re-export main types
pub use crawl_phase::CrawlPhase;
