// src/mirror/extract.rs
// =============================================================================
// This module finds what a page references.
//
// Two kinds of references come out of a page:
// - Assets: stylesheets (<link rel="stylesheet">), icons (<link rel="icon">),
//   scripts (<script src>) and images (<img src>). These are downloaded as-is.
// - Links: <a href> pointing at another HTML page on the same host. These
//   are crawled in turn.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails on bad markup (html5ever repairs it like a browser would)
//
// Rust concepts:
// - BTreeSet: a sorted set, so results come out in a stable order
// - Iterators and closures for filtering references
// =============================================================================

use crate::error::{MirrorError, MirrorResult};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

// (selector, attribute holding the URL)
const ASSET_SELECTORS: [(&str, &str); 4] = [
    ("link[rel~=\"stylesheet\"][href]", "href"),
    ("link[rel~=\"icon\"][href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
];

/// References discovered on one page
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageReferences {
    /// Stylesheets, scripts and images, any host
    pub assets: BTreeSet<Url>,
    /// Same-host links to HTML pages
    pub links: BTreeSet<Url>,
}

// Extracts asset and page references from an HTML document
//
// Parameters:
//   document: raw page bytes (decoded lossily if not UTF-8)
//   page_url: the URL the page was fetched from (for relative references)
//   domain: host the crawl is restricted to
//
// Returns: the references, or a Parse error when the page URL can't be used
// to resolve anything. The caller treats that as a warning.
//
// Example:
//   document = "<a href='/docs/'>Docs</a><img src='logo.png'>"
//   page_url = "https://example.com/index.html"
//   links    = ["https://example.com/docs/"]
//   assets   = ["https://example.com/logo.png"]
pub fn extract_references(
    document: &[u8],
    page_url: &Url,
    domain: &str,
) -> MirrorResult<PageReferences> {
    if page_url.cannot_be_a_base() {
        return Err(MirrorError::Parse {
            url: page_url.to_string(),
            reason: "page URL cannot be used to resolve references".to_string(),
        });
    }

    let html = String::from_utf8_lossy(document);
    let document = Html::parse_document(&html);

    let mut references = PageReferences::default();

    for (selector, attr) in ASSET_SELECTORS {
        // Constant selectors, known to be valid
        let selector = Selector::parse(selector).unwrap();
        for element in document.select(&selector) {
            if let Some(url) = element.value().attr(attr).and_then(|r| resolve_url(page_url, r)) {
                references.assets.insert(url);
            }
        }
    }

    let anchors = Selector::parse("a[href]").unwrap();
    for element in document.select(&anchors) {
        if let Some(url) = element.value().attr("href").and_then(|r| resolve_url(page_url, r)) {
            if is_followable_link(&url, domain) {
                references.links.insert(url);
            }
        }
    }

    Ok(references)
}

// Resolves a possibly-relative reference to an absolute http(s) URL
//
// The fragment is dropped: "page.html#intro" and "page.html" are the same
// file on disk.
//
// Examples (base = "https://example.com/blog/post.html"):
//   "/docs"            -> Some("https://example.com/docs")
//   "../about/"        -> Some("https://example.com/about/")
//   "#top"             -> Some("https://example.com/blog/post.html")
//   "mailto:a@b.com"   -> None
//   "data:image/png;…" -> None
fn resolve_url(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let mut url = base.join(reference).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

// A link is followed only if it stays on the crawl host and looks like an
// HTML page: empty path, a directory ("/docs/") or an ".html" file
fn is_followable_link(url: &Url, domain: &str) -> bool {
    if url.host_str() != Some(domain) {
        return false;
    }

    let path = url.path();
    path.is_empty() || path.ends_with('/') || path.ends_with(".html")
}
