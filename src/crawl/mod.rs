// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a URL, with an explicit work queue
// - Bounded number of concurrent downloads
// - Respects same-domain restriction (doesn't follow links to external sites)
// - Each URL processed at most once per run
// - Graceful cancellation (running downloads finish, nothing new starts)
//
// Rust concepts:
// - Async programming: For concurrent network requests
// - Collections: DashSet for tracking visited URLs, VecDeque for queue
// =============================================================================

mod queue;
mod summary;
mod task;
mod visited;

// Re-export the main crawling function and its result type
pub use queue::mirror_site;
pub use summary::CrawlSummary;
