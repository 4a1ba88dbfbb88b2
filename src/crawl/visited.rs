// src/crawl/visited.rs
// =============================================================================
// The dedup store: every URL that has ever been admitted to the frontier.
//
// Only the dispatcher owns one of these, and it only touches it from its own
// loop. That makes admit() a single test-and-insert with no other task able
// to sneak in between, so no locks are needed.
//
// Rust concepts:
// - HashSet::insert returns false when the value was already there, which is
//   exactly the "is this new?" question in one call
// =============================================================================

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
    // Admission order, used for reporting
    order: Vec<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Records `url` and returns true the first time it is seen, false after
    pub fn admit(&mut self, url: &str) -> bool {
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.order.push(url.to_string());
        true
    }

    // Total number of URLs ever admitted
    pub fn total(&self) -> usize {
        self.order.len()
    }

    pub fn into_ordered(self) -> Vec<String> {
        self.order
    }
}
