// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::Parser;

use crate::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};

#[derive(Parser, Debug)]
#[command(
    name = "domain-crawler",
    version,
    about = "Crawl every reachable page of one domain exactly once",
    long_about = "domain-crawler starts from a seed page, follows every link that stays inside \
                  the given domain, and visits each distinct URL once. It stops by itself when \
                  there is nothing left to fetch, or when you press Ctrl-C."
)]
pub struct Cli {
    /// Domain to crawl (e.g., example.com or https://example.com)
    pub domain: String,

    /// Page to start from (default: https://<domain>)
    #[arg(long)]
    pub seed: Option<String>,

    /// Number of pages fetched at the same time
    #[arg(long, default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
    pub workers: usize,

    /// Seconds to wait for one page before giving up on it
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Output the crawl report in JSON format instead of a summary
    #[arg(long)]
    pub json: bool,
}

// clap hands us the raw string; zero workers would never fetch anything
fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
