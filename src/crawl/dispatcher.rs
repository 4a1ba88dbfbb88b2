// src/crawl/dispatcher.rs
// =============================================================================
// The dispatcher owns the frontier and decides what gets fetched next.
//
// Each turn of the loop is in one of two states:
//
// - Offering (frontier not empty): race "hand the head URL to a worker"
//   against "take in a report". Whichever is ready first wins. If a report
//   wins, the head URL stays where it is for the next turn.
// - Starving (frontier empty): nothing to hand out, so only wait for reports.
//   If no fetch is outstanding either, nothing can ever arrive and the crawl
//   is complete.
//
// The frontier and the visited set live here and nowhere else, so admission
// is a plain single-threaded test-and-insert.
//
// Rust concepts:
// - VecDeque: push_back() for new URLs, pop_front() for the next one to fetch
// - Sender::reserve(): waits for room in the channel WITHOUT giving up the
//   value, so losing the race to a report costs nothing
// =============================================================================

use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::report::{CrawlOutcome, CrawlReport, FailedFetch, Report};
use super::scope::Scope;
use super::visited::VisitedSet;
use super::CrawlError;

pub struct Dispatcher {
    scope: Scope,
    frontier: VecDeque<String>,
    visited: VisitedSet,
    // URLs handed to the work channel whose report has not come back yet
    in_flight: usize,
    fetched: usize,
    failed: Vec<FailedFetch>,
}

impl Dispatcher {
    // Creates a dispatcher whose frontier holds just the seed
    pub fn new(scope: Scope, seed: &str) -> Result<Self, CrawlError> {
        let seed_url = scope
            .in_scope(seed)
            .ok_or_else(|| CrawlError::SeedOutOfScope {
                seed: seed.to_string(),
                domain: scope.domain().to_string(),
            })?;

        let mut dispatcher = Self {
            scope,
            frontier: VecDeque::new(),
            visited: VisitedSet::new(),
            in_flight: 0,
            fetched: 0,
            failed: Vec::new(),
        };
        dispatcher.admit(seed_url);

        Ok(dispatcher)
    }

    pub async fn run(
        mut self,
        work_tx: mpsc::Sender<String>,
        mut report_rx: mpsc::Receiver<Report>,
        cancel: CancellationToken,
    ) -> CrawlReport {
        let outcome = loop {
            if !self.frontier.is_empty() {
                // Offering: the head URL goes to whichever comes first, a
                // free slot in the work channel or a report from a worker.
                // Cancellation is checked first so a fired token always wins
                // over channels that closed because of it.
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break CrawlOutcome::Cancelled,
                    permit = work_tx.reserve() => {
                        // reserve() only fails once every receiver is gone
                        let Ok(permit) = permit else {
                            break self.stopped(&cancel);
                        };
                        // The slot is ours, so the URL leaves the frontier
                        // for good and counts as in flight until its report
                        // comes back
                        if let Some(url) = self.frontier.pop_front() {
                            debug!(url = %url, "dispatched");
                            permit.send(url);
                            self.in_flight += 1;
                        }
                    }
                    // A report won the race; the head URL stays put for the
                    // next turn of the loop
                    report = report_rx.recv() => match report {
                        Some(report) => self.absorb(report),
                        None => break self.stopped(&cancel),
                    },
                }
            } else if self.in_flight == 0 {
                // Nothing queued and nothing being fetched: no report can
                // ever arrive again, so the crawl is done
                break CrawlOutcome::Completed;
            } else {
                // Starving: nothing to hand out, so only wait for the
                // outstanding fetches to report back
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break CrawlOutcome::Cancelled,
                    report = report_rx.recv() => match report {
                        Some(report) => self.absorb(report),
                        None => break self.stopped(&cancel),
                    },
                }
            }
        };

        // Closing the work channel tells idle workers to stop
        drop(work_tx);

        if outcome == CrawlOutcome::Cancelled {
            // Take whatever reports are still on their way until every
            // worker has dropped its sender
            while let Some(report) = report_rx.recv().await {
                self.absorb(report);
            }
        }

        let report = self.into_report(outcome);
        info!(
            outcome = ?report.outcome,
            visited = report.visited_count(),
            fetched = report.fetched,
            failed = report.failed.len(),
            "crawl finished"
        );
        report
    }

    // A channel closed under us. Workers close their ends when they see the
    // token, so that still counts as a cancelled crawl.
    fn stopped(&self, cancel: &CancellationToken) -> CrawlOutcome {
        if cancel.is_cancelled() {
            CrawlOutcome::Cancelled
        } else {
            CrawlOutcome::WorkersExited
        }
    }

    // Folds one worker report into the frontier and the bookkeeping
    fn absorb(&mut self, report: Report) {
        // Every report, good or bad, closes out one in-flight fetch
        self.in_flight = self.in_flight.saturating_sub(1);

        match report.outcome {
            Ok(hrefs) => {
                self.fetched += 1;
                let admitted = self.admit_batch(hrefs);
                debug!(url = %report.url, admitted, "report absorbed");
            }
            // Failures are only recorded; the URL stays visited so it is
            // never tried again
            Err(e) => self.failed.push(FailedFetch {
                url: report.url,
                error: e.to_string(),
            }),
        }
    }

    // Scope-filters and dedups a discovery batch, appending new URLs to the
    // tail of the frontier in batch order. Returns how many were new.
    fn admit_batch(&mut self, hrefs: Vec<String>) -> usize {
        let mut admitted = 0;
        for href in hrefs {
            // Off-domain and unusable hrefs are dropped here
            if let Some(url) = self.scope.in_scope(&href) {
                if self.admit(url) {
                    admitted += 1;
                }
            }
        }
        admitted
    }

    fn admit(&mut self, url: String) -> bool {
        // The only place the visited set is written, so test-and-insert
        // cannot race with anything
        if !self.visited.admit(&url) {
            return false;
        }
        info!(url = %url, total = self.visited.total(), "admitted new url");
        self.frontier.push_back(url);
        true
    }

    fn into_report(self, outcome: CrawlOutcome) -> CrawlReport {
        CrawlReport {
            outcome,
            visited: self.visited.into_ordered(),
            fetched: self.fetched,
            failed: self.failed,
        }
    }
}
