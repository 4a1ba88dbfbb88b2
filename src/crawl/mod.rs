// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - One dispatcher task plus N worker tasks
// - Same-domain restriction (doesn't crawl external sites)
// - Every distinct URL is fetched at most once
// - Finishes on its own once there is nothing left to fetch
// - Stops cleanly when the cancellation token fires
//
// How the pieces talk:
//   dispatcher --(work channel, 1 slot)--> workers
//   workers --(report channel, 1 slot)--> dispatcher
//
// Everything crosses the channels by value, so there is no shared mutable
// state apart from the lock the workers take turns on to receive work.
// =============================================================================

mod dispatcher;
mod report;
mod scope;
mod visited;
mod worker;

use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::CrawlConfig;
use crate::fetch::PageFetcher;
use dispatcher::Dispatcher;
use scope::Scope;
use worker::Worker;

pub use report::{CrawlOutcome, CrawlReport};

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("seed '{seed}' is not inside domain '{domain}'")]
    SeedOutOfScope { seed: String, domain: String },

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("could not build HTTP client: {0}")]
    Client(String),
}

// Crawls every page reachable from the seed inside the configured domain
//
// Returns once the frontier is empty with no fetch outstanding, or once
// `cancel` fires and the workers have wound down.
pub async fn crawl(
    config: &CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
    cancel: CancellationToken,
) -> Result<CrawlReport, CrawlError> {
    if config.workers == 0 {
        return Err(CrawlError::NoWorkers);
    }

    let dispatcher = Dispatcher::new(Scope::new(config.domain.clone()), &config.seed)?;

    let (work_tx, work_rx) = mpsc::channel::<String>(1);
    let (report_tx, report_rx) = mpsc::channel(1);
    let work_rx = Arc::new(Mutex::new(work_rx));

    info!(
        domain = %config.domain,
        seed = %config.seed,
        workers = config.workers,
        "starting crawl"
    );

    let handles: Vec<_> = (0..config.workers)
        .map(|id| {
            let worker = Worker::new(id, Arc::clone(&fetcher), config.fetch_timeout);
            tokio::spawn(worker.run(Arc::clone(&work_rx), report_tx.clone(), cancel.clone()))
        })
        .collect();

    // Only the workers keep report senders, so the channel closes when the
    // last one exits
    drop(report_tx);

    let report = dispatcher.run(work_tx, report_rx, cancel).await;

    for joined in join_all(handles).await {
        if let Err(e) = joined {
            warn!(error = %e, "worker task failed");
        }
    }

    Ok(report)
}
