//! Crawl phase definitions for tracking a run's lifecycle
//!
//! A crawl moves forward only: it is seeded, runs, stops handing out pages
//! once the budget is hit, and finishes when no work remains in flight.

use std::fmt;

/// Represents the current phase of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Start URL is being placed on the frontier
    Seeding,

    /// Workers fetch pages and schedule newly found links
    Running,

    /// Page budget reached; no targets are handed out anymore and the run
    /// waits for pages already in flight
    Draining,

    /// Frontier exhausted or crawl stopped; workers exit
    Done,
}

impl CrawlPhase {
    /// Returns true while workers should keep pulling from the frontier
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if newly discovered links may still be scheduled
    pub fn accepts_new_targets(&self) -> bool {
        matches!(self, Self::Seeding | Self::Running)
    }

    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving from this phase to `next` is allowed
    ///
    /// Valid transitions:
    /// - Seeding → Running
    /// - Running → Draining
    /// - Running → Done
    /// - Draining → Done
    /// - Seeding → Done (crawl aborted before workers started)
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Seeding, Self::Running)
                | (Self::Seeding, Self::Done)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Done)
        )
    }

    /// Short lowercase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(CrawlPhase::Seeding.can_transition_to(CrawlPhase::Running));
        assert!(CrawlPhase::Running.can_transition_to(CrawlPhase::Draining));
        assert!(CrawlPhase::Running.can_transition_to(CrawlPhase::Done));
        assert!(CrawlPhase::Draining.can_transition_to(CrawlPhase::Done));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!CrawlPhase::Running.can_transition_to(CrawlPhase::Seeding));
        assert!(!CrawlPhase::Draining.can_transition_to(CrawlPhase::Running));
        assert!(!CrawlPhase::Done.can_transition_to(CrawlPhase::Running));
        assert!(!CrawlPhase::Done.can_transition_to(CrawlPhase::Draining));
    }

    #[test]
    fn test_no_self_transitions() {
        for phase in [
            CrawlPhase::Seeding,
            CrawlPhase::Running,
            CrawlPhase::Draining,
            CrawlPhase::Done,
        ] {
            assert!(!phase.can_transition_to(phase));
        }
    }

    #[test]
    fn test_draining_stops_pulls_and_admission() {
        assert!(!CrawlPhase::Draining.is_running());
        assert!(!CrawlPhase::Draining.accepts_new_targets());
        assert!(!CrawlPhase::Draining.is_terminal());
        assert!(CrawlPhase::Running.is_running());
        assert!(CrawlPhase::Running.accepts_new_targets());
    }

    #[test]
    fn test_done_is_terminal() {
        assert!(CrawlPhase::Done.is_terminal());
        assert!(!CrawlPhase::Done.is_running());
        assert!(!CrawlPhase::Running.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::Draining.to_string(), "draining");
    }
}
