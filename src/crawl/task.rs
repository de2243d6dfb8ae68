// src/crawl/task.rs
// =============================================================================
// A unit of crawl work: one absolute URL and what to do with it.
// =============================================================================

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fetch, save, and (if HTML) look for more assets and links
    Page,
    /// Fetch and save only
    Asset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub kind: TaskKind,
}

impl CrawlTask {
    pub fn page(url: Url) -> Self {
        Self {
            url,
            kind: TaskKind::Page,
        }
    }

    pub fn asset(url: Url) -> Self {
        Self {
            url,
            kind: TaskKind::Asset,
        }
    }
}
