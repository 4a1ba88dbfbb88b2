// src/crawl/report.rs
// =============================================================================
// Messages that flow back to the dispatcher, and the summary of a whole crawl.
// =============================================================================

use serde::Serialize;

use crate::fetch::FetchError;

// What a worker sends back after it is done with one URL
//
// Failures are reported too. The dispatcher counts every report against the
// fetches it has handed out, which is how it knows when the crawl is over.
#[derive(Debug)]
pub struct Report {
    pub url: String,
    pub outcome: Result<Vec<String>, FetchError>,
}

// How the crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// The frontier ran dry with no fetch outstanding
    Completed,
    /// The cancellation token fired before the crawl finished
    Cancelled,
    /// Every worker stopped while work was still pending
    WorkersExited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFetch {
    pub url: String,
    pub error: String,
}

// Everything the crawl learned, returned once the dispatcher stops
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    /// Every admitted URL, in admission order (seed first)
    pub visited: Vec<String>,
    /// Number of pages fetched successfully
    pub fetched: usize,
    pub failed: Vec<FailedFetch>,
}

impl CrawlReport {
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == CrawlOutcome::Completed
    }
}
