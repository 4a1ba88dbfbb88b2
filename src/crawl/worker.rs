// src/crawl/worker.rs
// =============================================================================
// One worker in the pool.
//
// Each worker loops forever:
// 1. Wait for a URL on the shared work channel
// 2. Fetch it and pull out its hrefs (with a per-page timeout)
// 3. Send the result back to the dispatcher on the report channel
//
// Workers never talk to each other and never touch the frontier or the
// visited set. They stop when the work channel closes or the cancellation
// token fires, whichever comes first.
//
// Rust concepts:
// - Arc<Mutex<Receiver>>: tokio's mpsc has one receiver, so the workers take
//   turns holding it. Whoever holds the lock gets the next URL.
// - tokio::select!: Wait on several things and act on whichever is ready first
// =============================================================================

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::report::Report;
use crate::fetch::{FetchError, PageFetcher};

pub type WorkQueue = Arc<Mutex<mpsc::Receiver<String>>>;

pub struct Worker {
    id: usize,
    fetcher: Arc<dyn PageFetcher>,
    fetch_timeout: Duration,
}

impl Worker {
    pub fn new(id: usize, fetcher: Arc<dyn PageFetcher>, fetch_timeout: Duration) -> Self {
        Self {
            id,
            fetcher,
            fetch_timeout,
        }
    }

    pub async fn run(
        self,
        queue: WorkQueue,
        reports: mpsc::Sender<Report>,
        cancel: CancellationToken,
    ) {
        loop {
            // Step 1: wait for the next URL. Whoever holds the lock on the
            // shared receiver gets it; the others queue up on the lock.
            let url = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = next_url(&queue) => match next {
                    Some(url) => url,
                    // Dispatcher is done handing out work
                    None => break,
                },
            };

            // Step 2: fetch the page. A cancelled crawl abandons the fetch
            // right away instead of waiting for the timeout.
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(url = %url, worker = self.id, "abandoning fetch");
                    break;
                }
                outcome = self.fetch(&url) => outcome,
            };

            match &outcome {
                Ok(hrefs) => info!(url = %url, anchors = hrefs.len(), "page fetched"),
                Err(e) => warn!(url = %url, error = %e, "fetch failed"),
            }

            // Step 3: report back, even on failure, so the dispatcher can
            // close out this URL
            let report = Report {
                url: url.clone(),
                outcome,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                sent = reports.send(report) => {
                    // The dispatcher has stopped listening
                    if sent.is_err() {
                        break;
                    }
                }
            }

            debug!(url = %url, worker = self.id, "finished processing");
        }

        debug!(worker = self.id, "worker stopped");
    }

    // Runs one fetch with the per-page timeout
    //
    // A panic inside the fetcher is caught and turned into a failed fetch.
    // If it escaped, this worker would die with its URL still counted as in
    // flight, and the dispatcher would wait for that report forever.
    async fn fetch(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let guarded = AssertUnwindSafe(self.fetcher.fetch_and_extract(url)).catch_unwind();

        match tokio::time::timeout(self.fetch_timeout, guarded).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(panic)) => Err(FetchError::Panicked(panic_message(panic.as_ref()))),
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout)),
        }
    }
}

// Panic payloads are usually a &str or a String
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

async fn next_url(queue: &WorkQueue) -> Option<String> {
    queue.lock().await.recv().await
}
