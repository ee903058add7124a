//! Crawl frontier: the pending-work queue shared by all workers
//!
//! The frontier is a plain FIFO plus a count of items currently being
//! worked on. It carries no lock of its own; it lives inside the crawl job's
//! single mutex so that "check discovered set, then push" stays atomic.

use crate::url::CrawlTarget;
use std::collections::VecDeque;

/// FIFO of crawl targets awaiting a fetch
#[derive(Debug, Default)]
pub struct Frontier {
    /// Targets waiting for a worker
    queue: VecDeque<CrawlTarget>,

    /// Targets handed to a worker and not yet completed
    in_flight: usize,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a target to the back of the queue
    ///
    /// Deduplication is the caller's job; the frontier trusts that a target
    /// is only pushed once.
    pub fn push(&mut self, target: CrawlTarget) {
        self.queue.push_back(target);
    }

    /// Takes the next target and counts it as in flight
    pub fn take(&mut self) -> Option<CrawlTarget> {
        let target = self.queue.pop_front()?;
        self.in_flight += 1;
        Some(target)
    }

    /// Takes the next target without counting it as in flight
    ///
    /// Used for items that will be discarded immediately (already visited).
    pub fn discard_next(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    /// Looks at the next target without removing it
    pub fn peek(&self) -> Option<&CrawlTarget> {
        self.queue.front()
    }

    /// Marks one in-flight target as finished
    pub fn complete(&mut self) {
        debug_assert!(self.in_flight > 0, "complete() without matching take()");
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Number of targets waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no target is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of targets currently held by workers
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Returns true when nothing is queued and nothing is being worked on
    ///
    /// Once exhausted, no worker can produce new targets, so the crawl is over.
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty() && self.in_flight == 0
    }

    /// Returns true if the target is currently waiting in the queue
    pub fn contains(&self, target: &CrawlTarget) -> bool {
        self.queue.contains(target)
    }
}
