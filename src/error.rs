// src/error.rs
// =============================================================================
// Error types for the mirroring core.
//
// Every error here is a "soft" failure: it aborts the task that produced it
// (one page or one asset), never the whole crawl. The scheduler logs it,
// counts it in the summary, and moves on to the next URL.
//
// Rust concepts:
// - thiserror: derive macro that writes the Display and Error impls for us
// - Enums with data: each variant carries the details of what went wrong
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a fetch failed
///
/// Mirrors the categories a link checker cares about, so the log line
/// tells you whether the remote site or the network is to blame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Too many redirects (redirect loop)
    #[error("too many redirects")]
    TooManyRedirects,
    /// Could not resolve hostname
    #[error("could not resolve hostname")]
    Dns,
    /// Connection refused / reset / unreachable
    #[error("connection failed")]
    Connect,
    /// SSL/TLS certificate error
    #[error("SSL certificate error")]
    Tls,
    /// Server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// Anything else (body read errors, malformed responses...)
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum MirrorError {
    /// Network, timeout or non-2xx failure (remote-site problem)
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: FetchFailure },

    /// URL cannot be turned into a safe local path
    #[error("malformed URL {url}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// Page content could not be used for link discovery
    #[error("parse warning for {url}: {reason}")]
    Parse { url: String, reason: String },

    /// Filesystem failure (local environment problem)
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shared HTTP client could not be built (setup problem, no URL involved)
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl MirrorError {
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        MirrorError::MalformedUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the mirroring core
pub type MirrorResult<T> = Result<T, MirrorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let err = MirrorError::Fetch {
            url: "https://example.com/missing".to_string(),
            reason: FetchFailure::Status(404),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com/missing: HTTP 404"
        );
    }

    #[test]
    fn test_fetch_failure_messages() {
        assert_eq!(FetchFailure::Timeout.to_string(), "request timed out");
        assert_eq!(FetchFailure::Tls.to_string(), "SSL certificate error");
        assert_eq!(FetchFailure::Status(503).to_string(), "HTTP 503");
        assert_eq!(
            FetchFailure::Other("body read failed".to_string()).to_string(),
            "body read failed"
        );
    }

    #[test]
    fn test_http_client_error_has_no_empty_url() {
        // A newline is not allowed in a header value, so build() fails
        let source = reqwest::Client::builder()
            .user_agent("bad\nagent")
            .build()
            .unwrap_err();
        let err = MirrorError::HttpClient(source);

        assert!(err.to_string().starts_with("failed to create HTTP client: "));
        assert!(!err.to_string().contains("failed to fetch"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_write_error_keeps_source() {
        let err = MirrorError::Write {
            path: PathBuf::from("public/index.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("public/index.html"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
