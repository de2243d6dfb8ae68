// src/crawl/visited.rs
// =============================================================================
// This module remembers which URLs have already been scheduled.
//
// Every URL goes through try_mark() before it is queued. The first caller
// for a given URL gets `true` and owns the work; every later caller gets
// `false` and drops it. The check and the insert happen in one call, so two
// workers discovering the same link at the same moment can't both queue it.
//
// The registry lives only in memory, for one run. Files already on disk
// from a previous run are handled by the writer (skip-if-exists).
//
// Rust concepts:
// - Arc: shared ownership across threads (clones point to the same set)
// - DashSet: a HashSet that many threads can insert into at once
// =============================================================================

use dashmap::DashSet;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct VisitedRegistry {
    seen: Arc<DashSet<String>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited
    ///
    /// Returns true if this call added it (caller should process the URL),
    /// false if it was already there (caller must skip it).
    pub fn try_mark(&self, url: &Url) -> bool {
        self.seen.insert(url.as_str().to_owned())
    }

    /// Number of distinct URLs marked so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
