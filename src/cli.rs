// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// A missing URL is a usage error: clap prints the usage to stderr and exits
// with a non-zero status before our code runs.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "site-mirror",
    version,
    about = "Mirror a website (pages, stylesheets, scripts, images) to local disk",
    long_about = "site-mirror starts at a URL, follows links to HTML pages on the same host, \
                  and saves every page and the assets it references under an output directory. \
                  Files that already exist are never overwritten, so re-running only fills gaps."
)]
pub struct Cli {
    /// Start URL (e.g., https://example.com/docs/)
    ///
    /// This is a positional argument (required, no flag needed)
    pub url: String,

    /// Directory the site is mirrored into
    #[arg(short, long, default_value = "public")]
    pub output: PathBuf,

    /// How many URLs to download at the same time
    #[arg(short, long, default_value_t = 8)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = 10)]
    pub timeout: u64,

    /// Print the final summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log debug details (skipped files, discovered URLs)
    #[arg(short, long)]
    pub verbose: bool,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[arg(short, long)] do?
//    - short: creates a one-letter flag from the field name (-o, -c, -t)
//    - long: creates a full flag from the field name (--output, --concurrency)
//
// 2. default_value vs default_value_t?
//    - default_value takes a string that clap parses like user input
//    - default_value_t takes a typed Rust value (8, 10, ...)
//
// 3. Why PathBuf for the output directory?
//    - PathBuf is the owned path type; clap can parse it directly
//    - It avoids converting String -> PathBuf later
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_is_an_error() {
        assert!(Cli::try_parse_from(["site-mirror"]).is_err());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "site-mirror",
            "https://example.com",
            "-o",
            "mirror",
            "--concurrency",
            "4",
            "--timeout",
            "30",
            "--json",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.output, PathBuf::from("mirror"));
        assert_eq!(cli.concurrency, 4);
        assert_eq!(cli.timeout, 30);
        assert!(cli.json);
        assert!(cli.verbose);
    }
}
