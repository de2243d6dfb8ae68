// src/crawl/summary.rs
// =============================================================================
// Counters for one crawl run, printed at the end as a table or as JSON.
//
// Only the scheduler loop touches the summary; workers hand back their
// results and the loop adds them up. No locking needed.
// =============================================================================

use super::task::TaskKind;
use crate::error::MirrorError;
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// HTML pages written to disk
    pub pages_saved: usize,
    /// Stylesheets, scripts and images written to disk
    pub assets_saved: usize,
    /// Total bytes written
    pub bytes_written: u64,
    /// Files that already existed and were left alone
    pub skipped_existing: usize,
    pub fetch_failures: usize,
    pub write_failures: usize,
    pub malformed_urls: usize,
    pub parse_warnings: usize,
    /// URLs discovered but never processed because the crawl was cancelled
    pub dropped: usize,
    pub cancelled: bool,
}

impl CrawlSummary {
    pub fn record_saved(&mut self, kind: TaskKind, bytes: usize) {
        match kind {
            TaskKind::Page => self.pages_saved += 1,
            TaskKind::Asset => self.assets_saved += 1,
        }
        self.bytes_written += bytes as u64;
    }

    pub fn record_skipped(&mut self) {
        self.skipped_existing += 1;
    }

    pub fn record_error(&mut self, error: &MirrorError) {
        match error {
            MirrorError::Fetch { .. } | MirrorError::HttpClient(_) => self.fetch_failures += 1,
            MirrorError::Write { .. } => self.write_failures += 1,
            MirrorError::MalformedUrl { .. } => self.malformed_urls += 1,
            MirrorError::Parse { .. } => self.parse_warnings += 1,
        }
    }

    /// Total number of per-task problems
    pub fn error_count(&self) -> usize {
        self.fetch_failures + self.write_failures + self.malformed_urls + self.parse_warnings
    }

    // Prints the summary as a human-readable table
    pub fn print_table(&self) {
        println!();
        println!("📊 Summary:");
        println!("   📄 Pages saved:      {}", self.pages_saved);
        println!("   🎨 Assets saved:     {}", self.assets_saved);
        println!("   💾 Bytes written:    {}", self.bytes_written);
        println!("   ⏭️  Already on disk:  {}", self.skipped_existing);
        println!("   ❌ Fetch failures:   {}", self.fetch_failures);
        println!("   🗄️  Write failures:   {}", self.write_failures);
        println!("   ⚠️  Malformed URLs:   {}", self.malformed_urls);
        println!("   ⚠️  Parse warnings:   {}", self.parse_warnings);
        if self.cancelled {
            println!("   🛑 Cancelled, {} URL(s) not processed", self.dropped);
        }
    }
}
