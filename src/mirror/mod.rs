// src/mirror/mod.rs
// =============================================================================
// This module contains everything needed to copy one URL to disk.
//
// Submodules:
// - path: Maps URLs to local file paths
// - extract: Finds assets and links in HTML pages
// - fetch: Downloads pages and assets over HTTP(S)
// - writer: Saves bytes to disk without overwriting
//
// The crawl module decides *which* URLs to mirror; this module knows *how*.
// =============================================================================

mod extract;
mod fetch;
mod path;
mod writer;

pub use extract::extract_references;
pub use fetch::Fetcher;
pub use path::PathMapper;
pub use writer::{file_exists, write_if_absent, WriteOutcome};
