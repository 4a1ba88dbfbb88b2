// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing events go to stderr)
// 3. Build the crawl configuration and the HTTP fetcher
// 4. Run the crawl until it completes or Ctrl-C is pressed
// 5. Print the report and exit (0 = crawl finished, 2 = error)
//
// Pages that fail to load are logged and listed in the report, but they never
// make the process fail.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod fetch;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CrawlConfig;
use crawl::CrawlReport;
use fetch::{HttpFetcher, PageFetcher};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that `--json` output on stdout stays parseable.
// RUST_LOG overrides the default level, e.g. RUST_LOG=domain_crawler=debug
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("domain_crawler=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = CrawlConfig::from_cli(&cli)?;

    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpFetcher::new(&config.domain, config.fetch_timeout, &config.user_agent)?);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping crawl");
            on_ctrl_c.cancel();
        }
    });

    let report = crawl::crawl(&config, fetcher, cancel).await?;

    print_report(&report, cli.json)?;

    Ok(0)
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &CrawlReport) {
    if !report.failed.is_empty() {
        println!("{:<70} {:<30}", "FAILED URL", "ERROR");
        println!("{}", "=".repeat(100));
        for failed in &report.failed {
            // Truncate URL if too long for display
            let url_display = if failed.url.chars().count() > 67 {
                format!("{}...", failed.url.chars().take(67).collect::<String>())
            } else {
                failed.url.clone()
            };
            println!("{:<70} {:<30}", url_display, failed.error);
        }
        println!();
    }

    let outcome = if report.is_complete() {
        "completed"
    } else {
        "stopped early"
    };

    println!("📊 Crawl {}:", outcome);
    println!("   🔗 Visited: {}", report.visited_count());
    println!("   ✅ Fetched: {}", report.fetched);
    println!("   ❌ Failed: {}", report.failed.len());
}
