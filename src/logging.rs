// src/logging.rs
// =============================================================================
// Logging setup.
//
// Crawl events (page crawled, file saved, file skipped, errors) are emitted
// with the `tracing` macros and printed to stderr by tracing-subscriber, one
// line per event. stdout stays free for the final summary (useful with --json).
//
// The RUST_LOG environment variable overrides the default filter, e.g.
//   RUST_LOG=site_mirror=debug site-mirror https://example.com
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,site_mirror=debug"
    } else {
        "info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
