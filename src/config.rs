// src/config.rs
// =============================================================================
// Turns the parsed command line into a validated crawl configuration.
//
// The CLI struct holds raw strings and numbers; MirrorConfig holds values the
// crawler can use directly (a parsed Url, a PathBuf, a Duration). All the
// "is this argument valid?" checks happen here, once, before any network or
// disk activity.
// =============================================================================

use crate::cli::Cli;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Where the crawl starts; also defines the host and the path prefix
    pub start_url: Url,
    /// Root directory for mirrored files
    pub output_dir: PathBuf,
    /// Maximum number of URLs processed at the same time
    pub concurrency: usize,
    /// Timeout for each HTTP request
    pub timeout: Duration,
}

impl MirrorConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            start_url: parse_start_url(&cli.url)?,
            output_dir: cli.output.clone(),
            concurrency: cli.concurrency.max(1),
            timeout: Duration::from_secs(cli.timeout.max(1)),
        })
    }
}

// Parses and validates the start URL
//
// Must be absolute, http or https, and have a host. The fragment is dropped
// so "https://example.com/#top" and "https://example.com/" are the same start.
fn parse_start_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| anyhow!("Invalid URL '{}': {}", raw, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("URL must use http or https: {}", raw));
    }

    if url.host_str().is_none() {
        return Err(anyhow!("URL has no host: {}", raw));
    }

    url.set_fragment(None);
    Ok(url)
}
