// src/mirror/fetch.rs
// =============================================================================
// This module downloads pages and assets over HTTP(S).
//
// Key functionality:
// - One shared reqwest Client (connection pooling across all workers)
// - Per-request timeout, bounded redirect following
// - Non-2xx responses are errors, not content
// - Transport errors are sorted into categories (timeout, DNS, TLS, ...)
//
// No retry: a failed URL is logged and dropped.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - map_err: converting library errors into our own error type
// =============================================================================

use crate::error::{FetchFailure, MirrorError, MirrorResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;
use url::Url;

// Follow at most this many redirects before giving up
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Raw response body
    pub body: Vec<u8>,
    /// Value of the Content-Type header, if the server sent one
    pub content_type: Option<String>,
}

impl FetchedResource {
    /// Returns true if the server says this is an HTML document
    ///
    /// Without a Content-Type header we go by the URL instead: directory
    /// paths and ".html" files are assumed to be HTML.
    pub fn is_html(&self, url: &Url) -> bool {
        match &self.content_type {
            Some(content_type) => {
                let mime = content_type
                    .split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_ascii_lowercase();
                mime == "text/html" || mime == "application/xhtml+xml"
            }
            None => {
                let path = url.path();
                path.ends_with('/') || path.ends_with(".html") || path.ends_with(".htm")
            }
        }
    }
}

/// HTTP client used by the crawl workers
///
/// Cloning is cheap: the inner reqwest Client is reference counted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> MirrorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MirrorError::HttpClient)?;

        Ok(Self { client })
    }

    // Fetches one URL and returns its body
    //
    // Returns: FetchedResource on 2xx, MirrorError::Fetch otherwise
    pub async fn fetch(&self, url: &Url) -> MirrorResult<FetchedResource> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Fetch {
                url: url.to_string(),
                reason: FetchFailure::Status(status.as_u16()),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| fetch_error(url, e))?;

        Ok(FetchedResource {
            body: body.to_vec(),
            content_type,
        })
    }
}

// Turns a reqwest error into a MirrorError with a readable reason
fn fetch_error(url: &Url, error: reqwest::Error) -> MirrorError {
    MirrorError::Fetch {
        url: url.to_string(),
        reason: categorize_error(&error),
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - etc.
fn categorize_error(error: &reqwest::Error) -> FetchFailure {
    // Look through the whole source chain; the interesting part
    // (e.g. "dns error") is usually a few levels down
    let mut chain = error.to_string();
    let mut source = StdError::source(error);
    while let Some(inner) = source {
        chain.push_str(": ");
        chain.push_str(&inner.to_string());
        source = inner.source();
    }
    let lowered = chain.to_lowercase();

    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error.is_connect() {
        if lowered.contains("dns") {
            FetchFailure::Dns
        } else {
            FetchFailure::Connect
        }
    } else if lowered.contains("certificate") || lowered.contains("ssl") || lowered.contains("tls") {
        FetchFailure::Tls
    } else {
        FetchFailure::Other(chain)
    }
}
