// src/config.rs
// =============================================================================
// Crawl configuration, built once at startup and never changed afterwards.
//
// The domain can be given as a bare host ("example.com") or as a URL
// ("https://example.com/"). Either way we keep just the host, which is what
// the scope filter matches against.
// =============================================================================

use anyhow::{anyhow, bail, Result};
use std::time::Duration;
use url::Url;

use crate::cli::Cli;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str =
    concat!("domain-crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub domain: String,
    pub seed: String,
    pub workers: usize,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl CrawlConfig {
    // Defaults for everything except the domain; the seed is the domain root
    pub fn new(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            seed: format!("https://{}", domain),
            domain,
            workers: DEFAULT_WORKERS,
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let domain = parse_domain(&cli.domain)?;
        let mut config = Self::new(domain)
            .with_workers(cli.workers)
            .with_fetch_timeout(Duration::from_secs(cli.timeout));

        if let Some(seed) = &cli.seed {
            Url::parse(seed).map_err(|e| anyhow!("Invalid seed URL '{}': {}", seed, e))?;
            config = config.with_seed(seed.clone());
        }
        if let Some(user_agent) = &cli.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }

        Ok(config)
    }
}

// Turns "example.com", "https://example.com/" or "example.com/path" into
// "example.com"
fn parse_domain(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Domain must not be empty");
    }

    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| anyhow!("Invalid domain '{}': {}", input, e))?;

    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Domain has no host: {}", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("example.com");
        assert_eq!(config.seed, "https://example.com");
        assert_eq!(config.workers, 4);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_domain_forms() {
        assert_eq!(parse_domain("example.com").unwrap(), "example.com");
        assert_eq!(parse_domain("https://example.com/").unwrap(), "example.com");
        assert_eq!(parse_domain("http://Example.com/a/b").unwrap(), "example.com");
        assert_eq!(parse_domain(" example.com/docs ").unwrap(), "example.com");
    }

    #[test]
    fn test_parse_domain_rejects_empty() {
        assert!(parse_domain("").is_err());
        assert!(parse_domain("   ").is_err());
    }

    #[test]
    fn test_from_cli() {
        let cli = Cli::parse_from([
            "domain-crawler",
            "https://example.com",
            "--seed",
            "https://example.com/start",
            "--workers",
            "8",
            "--timeout",
            "3",
        ]);
        let config = CrawlConfig::from_cli(&cli).unwrap();
        assert_eq!(config.domain, "example.com");
        assert_eq!(config.seed, "https://example.com/start");
        assert_eq!(config.workers, 8);
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_cli_rejects_bad_seed() {
        let cli = Cli::parse_from(["domain-crawler", "example.com", "--seed", "not a url"]);
        assert!(CrawlConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_workers() {
        let result = Cli::try_parse_from(["domain-crawler", "example.com", "--workers", "0"]);
        assert!(result.is_err());
    }
}
