// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate them into a MirrorConfig
// 3. Run the crawl (Ctrl-C stops it gracefully)
// 4. Print a summary
// 5. Exit with proper code (0 = crawl ran, 2 = bad arguments / setup error)
//
// Per-page failures (404s, timeouts, disk errors on one file) do NOT change
// the exit code; they are logged and counted in the summary.
//
// Rust concepts used:
// - async/await: Because we need to make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated settings
mod crawl; // src/crawl/ - work queue, workers, visited registry
mod error; // src/error.rs - error types
mod logging; // src/logging.rs - tracing setup
mod mirror; // src/mirror/ - fetch, extract, map, write

use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use config::MirrorConfig;
use tokio_util::sync::CancellationToken;
use tracing::warn;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // On a missing or bad argument clap prints usage to stderr and exits
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
async fn run(cli: Cli) -> Result<()> {
    let config = MirrorConfig::from_cli(&cli)?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    if !cli.json {
        println!("🔍 Mirroring {} into {}", config.start_url, config.output_dir.display());
    }

    let summary: crawl::CrawlSummary = crawl::mirror_site(&config, cancel).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print_table();
    }

    Ok(())
}

// Waits for Ctrl-C and then asks the crawl to stop
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("interrupt received, finishing running downloads");
        cancel.cancel();
    }
}
