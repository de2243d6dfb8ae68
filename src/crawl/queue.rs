// src/crawl/queue.rs
// =============================================================================
// This module runs the crawl: a work queue processed by a pool of workers.
//
// How it works:
// 1. Start with the start URL in the queue
// 2. Hand queued URLs to workers, at most `concurrency` at a time
// 3. A worker fetches its URL and saves it (skipping files already on disk)
// 4. For HTML pages, the worker extracts assets and same-host links, marks
//    each one in the visited registry, and hands the new ones back
// 5. New URLs go to the back of the queue
// 6. Stop when the queue is empty and no worker is busy
//
// Every error is per-URL: it is logged, counted, and the crawl continues.
//
// Cancellation:
// - When the token fires, no new URLs are started and the queue is dropped
// - Workers already running finish (no half-written files)
//
// Rust concepts:
// - VecDeque: Double-ended queue for breadth-first crawling
// - tokio::spawn: run a worker as its own task (may run on another thread)
// - FuturesUnordered: a set of running tasks, yielding each as it finishes
// - tokio::select!: wait for whichever of several events happens first
// =============================================================================

use super::summary::CrawlSummary;
use super::task::{CrawlTask, TaskKind};
use super::visited::VisitedRegistry;
use crate::config::MirrorConfig;
use crate::error::{MirrorError, MirrorResult};
use crate::mirror::{
    extract_references, file_exists, write_if_absent, Fetcher, PathMapper, WriteOutcome,
};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

// What one worker did with one task
#[derive(Debug)]
struct TaskReport {
    kind: TaskKind,
    saved: Option<usize>,
    skipped: bool,
    errors: Vec<MirrorError>,
    // URLs this task discovered that nobody had seen before
    discovered: Vec<CrawlTask>,
}

// Everything a worker needs; cheap to clone (all shared handles)
#[derive(Debug, Clone)]
struct Worker {
    fetcher: Fetcher,
    mapper: PathMapper,
    registry: VisitedRegistry,
    domain: Arc<str>,
}

// Mirrors a website starting from config.start_url
//
// Parameters:
//   config: start URL, output directory, concurrency, timeout
//   cancel: token that stops the crawl gracefully when cancelled
//
// Returns: counters for the whole run. Only setup problems (output directory
// can't be created, HTTP client can't be built) are returned as errors.
pub async fn mirror_site(
    config: &MirrorConfig,
    cancel: CancellationToken,
) -> MirrorResult<CrawlSummary> {
    let start = config.start_url.clone();
    let domain = start
        .host_str()
        .ok_or_else(|| MirrorError::malformed(start.as_str(), "URL has no host"))?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| MirrorError::Write {
            path: config.output_dir.clone(),
            source,
        })?;

    let worker = Worker {
        fetcher: Fetcher::new(config.timeout)?,
        mapper: PathMapper::new(start.clone(), &config.output_dir),
        registry: VisitedRegistry::new(),
        domain: Arc::from(domain),
    };

    info!(
        url = %start,
        output = %config.output_dir.display(),
        concurrency = config.concurrency,
        "starting mirror"
    );

    let mut queue = VecDeque::new();
    if worker.registry.try_mark(&start) {
        queue.push_back(CrawlTask::page(start));
    }

    let mut in_flight = FuturesUnordered::new();
    let mut summary = CrawlSummary::default();
    let concurrency = config.concurrency.max(1);

    loop {
        if cancel.is_cancelled() && !queue.is_empty() {
            warn!(
                dropped = queue.len(),
                in_flight = in_flight.len(),
                "crawl cancelled, waiting for running downloads"
            );
            summary.dropped += queue.len();
            queue.clear();
        }

        while in_flight.len() < concurrency {
            match queue.pop_front() {
                Some(task) => in_flight.push(tokio::spawn(worker.clone().process(task))),
                None => break,
            }
        }

        let finished = tokio::select! {
            finished = in_flight.next() => finished,
            _ = cancel.cancelled(), if !queue.is_empty() => continue,
        };

        // Nothing running and (after the refill above) nothing queued: done
        let Some(joined) = finished else { break };

        let report = match joined {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "crawl worker panicked");
                continue;
            }
        };

        record(&mut summary, &report);

        if cancel.is_cancelled() {
            summary.dropped += report.discovered.len();
            summary.cancelled = true;
        } else {
            queue.extend(report.discovered);
        }
    }

    summary.cancelled |= cancel.is_cancelled();

    info!(
        urls = worker.registry.len(),
        pages = summary.pages_saved,
        assets = summary.assets_saved,
        errors = summary.error_count(),
        "mirror finished"
    );

    Ok(summary)
}

fn record(summary: &mut CrawlSummary, report: &TaskReport) {
    if let Some(bytes) = report.saved {
        summary.record_saved(report.kind, bytes);
    }
    if report.skipped {
        summary.record_skipped();
    }
    for e in &report.errors {
        summary.record_error(e);
    }
}

impl Worker {
    // Runs one task to completion; never fails, errors go into the report
    async fn process(self, task: CrawlTask) -> TaskReport {
        let mut report = TaskReport {
            kind: task.kind,
            saved: None,
            skipped: false,
            errors: Vec::new(),
            discovered: Vec::new(),
        };

        let result = match task.kind {
            TaskKind::Page => self.mirror_page(&task, &mut report).await,
            TaskKind::Asset => self.mirror_asset(&task, &mut report).await,
        };

        if let Err(e) = result {
            log_error(&e);
            report.errors.push(e);
        }

        report
    }

    async fn mirror_asset(&self, task: &CrawlTask, report: &mut TaskReport) -> MirrorResult<()> {
        let path = self.mapper.local_path(&task.url).await?;

        // Assets are only fetched when missing: nothing inside them is crawled
        if file_exists(&path).await {
            debug!(url = %task.url, path = %path.display(), "asset already exists, skipping");
            report.skipped = true;
            return Ok(());
        }

        info!(url = %task.url, "fetching asset");
        let resource = self.fetcher.fetch(&task.url).await?;
        self.save(task, &path, &resource.body, report).await
    }

    async fn mirror_page(&self, task: &CrawlTask, report: &mut TaskReport) -> MirrorResult<()> {
        // A page we can't store (directory creation failed) is still crawled
        // for links; a URL we can't map at all is skipped
        let path = match self.mapper.local_path(&task.url).await {
            Ok(path) => Some(path),
            Err(e @ MirrorError::Write { .. }) => {
                log_error(&e);
                report.errors.push(e);
                None
            }
            Err(e) => return Err(e),
        };

        // Pages are always fetched, even when saved before, because the
        // links inside them drive the rest of the crawl
        info!(url = %task.url, "crawling page");
        let resource = self.fetcher.fetch(&task.url).await?;

        // A failed write still lets us follow the page's links
        if let Some(path) = &path {
            if let Err(e) = self.save(task, path, &resource.body, report).await {
                log_error(&e);
                report.errors.push(e);
            }
        }

        if !resource.is_html(&task.url) {
            debug!(url = %task.url, "not HTML, no links extracted");
            return Ok(());
        }

        let references = extract_references(&resource.body, &task.url, &self.domain)?;

        for url in references.assets {
            if self.registry.try_mark(&url) {
                debug!(page = %task.url, asset = %url, "queued asset");
                report.discovered.push(CrawlTask::asset(url));
            }
        }

        for url in references.links {
            if self.registry.try_mark(&url) {
                debug!(page = %task.url, link = %url, "queued page");
                report.discovered.push(CrawlTask::page(url));
            }
        }

        Ok(())
    }

    async fn save(
        &self,
        task: &CrawlTask,
        path: &std::path::Path,
        body: &[u8],
        report: &mut TaskReport,
    ) -> MirrorResult<()> {
        match write_if_absent(path, body).await? {
            WriteOutcome::Written(bytes) => {
                info!(url = %task.url, path = %path.display(), bytes, "saved");
                report.saved = Some(bytes);
            }
            WriteOutcome::Skipped => {
                info!(url = %task.url, path = %path.display(), "already exists, skipping");
                report.skipped = true;
            }
        }
        Ok(())
    }
}

// Logs an error at a level matching who is to blame:
// local filesystem problems are errors, remote/site problems are warnings
fn log_error(e: &MirrorError) {
    match e {
        MirrorError::Write { .. } => error!(error = %e, "write failed"),
        MirrorError::Fetch { .. } => warn!(error = %e, "fetch failed"),
        MirrorError::MalformedUrl { .. } => warn!(error = %e, "skipping URL"),
        MirrorError::Parse { .. } => warn!(error = %e, "could not extract references"),
        MirrorError::HttpClient(_) => error!(error = %e, "HTTP client unavailable"),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an explicit queue instead of recursion?
//    - A recursive crawl(url) calling crawl(link) grows the call stack with
//      every level of links; a deep site can overflow it
//    - A queue keeps the pending work on the heap, and lets several workers
//      pull from it
//
// 2. Why does the worker return a report instead of updating the summary?
//    - Workers run on their own tasks (possibly other threads)
//    - Sending results back to the single loop means the summary needs no
//      Mutex
//
// 3. What is `let Some(x) = ... else { break };`?
//    - "let-else": bind x if the pattern matches, otherwise run the else
//      block, which must leave the current scope (break/continue/return)
//
// 4. What does `if !queue.is_empty()` do inside select!?
//    - It's a precondition: the branch is disabled when it's false
//    - Once the queue has been dropped after a cancel, we only wait for
//      running workers
// -----------------------------------------------------------------------------
