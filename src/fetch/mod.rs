// src/fetch/mod.rs
// =============================================================================
// This module is the boundary between the crawler and the network.
//
// Submodules:
// - http: Fetches a page over HTTP with reqwest
// - html: Pulls the raw href values out of an HTML page
//
// The crawler never talks to reqwest directly. It only knows about the
// PageFetcher trait below, which lets the tests swap in a fake website that
// lives entirely in memory.
//
// Rust concepts:
// - Traits: A shared interface that different types can implement
// - async-trait: Lets a trait have async methods and still be used as dyn
// - thiserror: Derives std::error::Error for our error enum
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use html::extract_hrefs;
pub use http::HttpFetcher;

// Why fetching one page failed
//
// Every variant is handled the same way by the crawler: the page is given up
// on, the error is logged, and the worker moves on to its next URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection or transport failure (DNS, refused, reset, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a status outside 200-299
    #[error("HTTP {0}")]
    Status(u16),

    /// The response body could not be read as an HTML document
    #[error("parse error: {0}")]
    Parse(String),

    /// The fetch took longer than the configured per-page timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The fetcher panicked; the worker caught it and carried on
    #[error("fetch panicked: {0}")]
    Panicked(String),
}

// Fetches a URL and returns the href values of every anchor on the page
//
// The hrefs are returned raw and in document order. Deciding which ones to
// follow is the crawler's job, not the fetcher's.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_and_extract(&self, url: &str) -> Result<Vec<String>, FetchError>;
}
