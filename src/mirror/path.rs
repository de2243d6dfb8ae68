// src/mirror/path.rs
// =============================================================================
// This module turns URLs into local file paths inside the output directory.
//
// The rules:
// - Strip the start URL's directory from the path
//   (http://example.com/local/about -> about)
// - Percent-decode each path segment (my%20page -> my page)
// - A path that is empty or ends in '/' becomes <path>/index.html
// - A last segment without a '.' gets ".html" appended
// - Anything that could climb out of the output directory ("..", encoded
//   slashes, NUL bytes, empty segments) is rejected instead of being written
// - Same-site paths outside the start directory go under _site/<full path>
// - Files from other origins (host, scheme or port) go under
//   _external/<scheme>/<host>_<port>/ so they can never overwrite files of
//   the mirrored site
// - A first segment named like one of those directories ("_site") gets an
//   extra '_' so two different URLs never end up in the same file
//
// The mapping itself is a pure function: same URL + same base = same path,
// on every run. That is what lets a second run find the files the first run
// wrote and skip them.
//
// Rust concepts:
// - PathBuf: an owned, growable filesystem path (like String for paths)
// - Cow: "clone on write" - borrowed when nothing changed, owned otherwise
// =============================================================================

use crate::error::{MirrorError, MirrorResult};
use std::path::PathBuf;
use url::Url;

// File name used for directory-like URLs
const INDEX_FILE: &str = "index.html";

// Directory (under the output root) holding files from other origins
const EXTERNAL_DIR: &str = "_external";

// Directory holding same-site files outside the start URL's directory
const SITE_DIR: &str = "_site";

// EXTERNAL_DIR and SITE_DIR without their leading '_'
const RESERVED_NAMES: [&str; 2] = ["external", "site"];

/// Maps URLs of one crawl to paths under one output root
#[derive(Debug, Clone)]
pub struct PathMapper {
    base: Url,
    root: PathBuf,
}

impl PathMapper {
    pub fn new(base: Url, root: impl Into<PathBuf>) -> Self {
        Self {
            base,
            root: root.into(),
        }
    }

    /// Path of `url` relative to the output root (no filesystem access)
    pub fn relative_path(&self, url: &Url) -> MirrorResult<PathBuf> {
        map_to_local_path(url, &self.base)
    }

    /// Full path of `url` under the output root
    ///
    /// Creates the containing directory if it does not exist yet, so the
    /// caller can open the file straight away. Calling this twice is fine.
    pub async fn local_path(&self, url: &Url) -> MirrorResult<PathBuf> {
        let path = self.root.join(self.relative_path(url)?);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| MirrorError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        Ok(path)
    }
}

// Converts a URL into a relative local path
//
// Parameters:
//   url: the page or asset URL (absolute)
//   base: the start URL of the crawl
//
// Returns: a relative PathBuf, or MalformedUrl if the URL cannot be stored
// safely
//
// Examples (base = "http://example.com/local/"):
//   http://example.com/local/            -> index.html
//   http://example.com/local/about       -> about.html
//   http://example.com/local/style.css   -> style.css
//   http://example.com/img/logo.png      -> _site/img/logo.png
//   http://example.com/local/_site/a.css -> __site/a.css
//   https://cdn.com/lib.js               -> _external/https/cdn.com_443/lib.js
pub fn map_to_local_path(url: &Url, base: &Url) -> MirrorResult<PathBuf> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(MirrorError::malformed(url.as_str(), "not an http(s) URL"));
    }

    let host = url
        .host_str()
        .ok_or_else(|| MirrorError::malformed(url.as_str(), "URL has no host"))?;

    let same_origin = url.scheme() == base.scheme()
        && Some(host) == base.host_str()
        && url.port_or_known_default() == base.port_or_known_default();

    let mut path = PathBuf::new();

    // Only paths under the base prefix live at the top of the output root;
    // their first segment is escaped if it looks like a reserved directory
    let (remainder, escape_reserved) = if !same_origin {
        path.push(EXTERNAL_DIR);
        path.push(url.scheme());
        path.push(format!("{}_{}", host, url.port_or_known_default().unwrap_or(0)));
        (url.path(), false)
    } else if let Some(rest) = strip_base_path(url.path(), base.path()) {
        (rest, true)
    } else {
        path.push(SITE_DIR);
        (url.path(), false)
    };

    if remainder.contains("//") {
        return Err(MirrorError::malformed(url.as_str(), "empty path segment"));
    }

    let remainder = remainder.strip_prefix('/').unwrap_or(remainder);
    let (remainder, is_directory) = match remainder.strip_suffix('/') {
        Some(dir) => (dir, true),
        None => (remainder, remainder.is_empty()),
    };

    let mut last_segment = None;
    if !remainder.is_empty() {
        for (i, raw) in remainder.split('/').enumerate() {
            let mut segment = decode_segment(url, raw)?;
            if i == 0 && escape_reserved && is_reserved_name(&segment) {
                segment.insert(0, '_');
            }
            path.push(&segment);
            last_segment = Some(segment);
        }
    }

    match last_segment {
        _ if is_directory => path.push(INDEX_FILE),
        Some(segment) if !segment.contains('.') => {
            path.set_file_name(format!("{}.html", segment));
        }
        _ => {}
    }

    Ok(path)
}

// Removes the start URL's directory from a path
//
// Returns None when the path is not under that directory. Only strips on a
// segment boundary: with base "/local/", the path "/localfoo" is NOT
// treated as "foo".
//
// A base ending in a file ("/local/index.html") counts as its directory
// ("/local"), so the start page and its siblings land side by side.
fn strip_base_path<'a>(path: &'a str, base_path: &str) -> Option<&'a str> {
    let prefix = match base_path.rsplit_once('/') {
        Some((dir, last)) if last.contains('.') => dir,
        _ => base_path.trim_end_matches('/'),
    };

    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

// True for "_external", "__external", "_site", "__site", ...
//
// Prepending one more '_' to such a name is a one-to-one rename that never
// produces the reserved directory names themselves.
fn is_reserved_name(segment: &str) -> bool {
    let bare = segment.trim_start_matches('_');
    segment.len() > bare.len() && RESERVED_NAMES.contains(&bare)
}

// Percent-decodes one path segment and checks it is safe to use as a
// file or directory name
//
// Malformed escapes ("%zz") are kept literally. Decoded bytes that are not
// valid UTF-8 are rejected.
fn decode_segment(url: &Url, raw: &str) -> MirrorResult<String> {
    if raw.is_empty() {
        return Err(MirrorError::malformed(url.as_str(), "empty path segment"));
    }

    let bytes = urlencoding::decode_binary(raw.as_bytes());
    let segment = String::from_utf8(bytes.into_owned())
        .map_err(|_| MirrorError::malformed(url.as_str(), "path is not valid UTF-8"))?;

    if segment == "." || segment == ".." {
        return Err(MirrorError::malformed(url.as_str(), "path traversal segment"));
    }

    if segment.contains(['/', '\\', '\0']) {
        return Err(MirrorError::malformed(
            url.as_str(),
            "path segment contains a separator or NUL byte",
        ));
    }

    Ok(segment)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does map_to_local_path return a *relative* path?
//    - The pure part (URL -> path) is easy to test without touching disk
//    - PathMapper::local_path adds the output root and creates directories
//
// 2. What does strip_prefix return?
//    - Option<&str>: Some(rest) if the string started with the prefix
//    - The result borrows from the original string, no allocation
//
// 3. Why reject ".." instead of normalizing it?
//    - The url crate already resolves "/../" (and "/%2e%2e/") when parsing
//    - decode_segment still refuses any segment that decodes to "." or "..",
//      so a path built from it can never leave the output root
//
// 4. What does the lifetime 'a in strip_base_path mean?
//    - The returned &str points into `path`, so it can't outlive it
//    - The compiler checks this for us
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map(url: &str, base: &str) -> MirrorResult<PathBuf> {
        map_to_local_path(&Url::parse(url).unwrap(), &Url::parse(base).unwrap())
    }

    const BASE: &str = "http://example.com/local/";

    #[test]
    fn test_start_url_maps_to_index() {
        assert_eq!(map(BASE, BASE).unwrap(), PathBuf::from("index.html"));
    }

    #[test]
    fn test_missing_extension_gets_html() {
        assert_eq!(
            map("http://example.com/local/about", BASE).unwrap(),
            PathBuf::from("about.html")
        );
    }

    #[test]
    fn test_extension_is_kept() {
        assert_eq!(
            map("http://example.com/local/style.css", BASE).unwrap(),
            PathBuf::from("style.css")
        );
    }

    #[test]
    fn test_nested_directory_gets_index() {
        assert_eq!(
            map("http://example.com/local/docs/guide/", BASE).unwrap(),
            PathBuf::from("docs/guide/index.html")
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let base = "http://example.com/local";
        assert_eq!(map(base, base).unwrap(), PathBuf::from("index.html"));
        assert_eq!(
            map("http://example.com/local/a.html", base).unwrap(),
            PathBuf::from("a.html")
        );
    }

    #[test]
    fn test_base_pointing_at_a_file() {
        let base = "http://example.com/local/index.html";
        assert_eq!(map(base, base).unwrap(), PathBuf::from("index.html"));
        assert_eq!(
            map("http://example.com/local/about", base).unwrap(),
            PathBuf::from("about.html")
        );
    }

    #[test]
    fn test_prefix_only_stripped_on_segment_boundary() {
        assert_eq!(
            map("http://example.com/localfoo/page", BASE).unwrap(),
            PathBuf::from("_site/localfoo/page.html")
        );
    }

    #[test]
    fn test_path_outside_base_goes_under_site_dir() {
        assert_eq!(
            map("http://example.com/static/app.js", BASE).unwrap(),
            PathBuf::from("_site/static/app.js")
        );
        assert_eq!(
            map("http://example.com/", BASE).unwrap(),
            PathBuf::from("_site/index.html")
        );
    }

    #[test]
    fn test_reserved_first_segment_is_escaped() {
        assert_eq!(
            map("http://example.com/local/_site/static/app.js", BASE).unwrap(),
            PathBuf::from("__site/static/app.js")
        );
        assert_eq!(
            map("http://example.com/local/__external/x.js", BASE).unwrap(),
            PathBuf::from("___external/x.js")
        );
        // Only exact reserved names, and only as the first segment
        assert_eq!(
            map("http://example.com/local/_sitemap.xml", BASE).unwrap(),
            PathBuf::from("_sitemap.xml")
        );
        assert_eq!(
            map("http://example.com/local/docs/_site/a.css", BASE).unwrap(),
            PathBuf::from("docs/_site/a.css")
        );
        assert_eq!(
            map("http://example.com/local/site/a.css", BASE).unwrap(),
            PathBuf::from("site/a.css")
        );
    }

    #[test]
    fn test_root_base() {
        let base = "https://example.com";
        assert_eq!(map(base, base).unwrap(), PathBuf::from("index.html"));
        assert_eq!(
            map("https://example.com/blog/post", base).unwrap(),
            PathBuf::from("blog/post.html")
        );
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            map("http://example.com/local/about?x=1#top", BASE).unwrap(),
            PathBuf::from("about.html")
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            map("http://example.com/local/my%20page", BASE).unwrap(),
            PathBuf::from("my page.html")
        );
    }

    #[test]
    fn test_malformed_escape_is_lenient() {
        assert_eq!(
            map("http://example.com/local/100%zz.txt", BASE).unwrap(),
            PathBuf::from("100%zz.txt")
        );
    }

    #[test]
    fn test_encoded_traversal_stays_inside_root() {
        let path = map("http://example.com/local/%2e%2e/%2e%2e/etc/passwd", BASE).unwrap();
        assert!(path
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_))));
    }

    #[test]
    fn test_traversal_segment_rejected() {
        let url = Url::parse(BASE).unwrap();
        assert!(decode_segment(&url, "..").is_err());
        assert!(decode_segment(&url, "%2e%2e").is_err());
        assert!(decode_segment(&url, ".").is_err());
        assert_eq!(decode_segment(&url, "...").unwrap(), "...");
    }

    #[test]
    fn test_literal_traversal_is_normalized_by_parser() {
        // Url::parse resolves "/../" before we ever see it
        assert_eq!(
            map("http://example.com/local/../../secret", BASE).unwrap(),
            PathBuf::from("_site/secret.html")
        );
    }

    #[test]
    fn test_encoded_slash_rejected() {
        let result = map("http://example.com/local/a%2Fb", BASE);
        assert!(matches!(result, Err(MirrorError::MalformedUrl { .. })));
        let result = map("http://example.com/local/a%5Cb", BASE);
        assert!(matches!(result, Err(MirrorError::MalformedUrl { .. })));
    }

    #[test]
    fn test_empty_segment_rejected() {
        let result = map("http://example.com/local/a//b", BASE);
        assert!(matches!(result, Err(MirrorError::MalformedUrl { .. })));
    }

    #[test]
    fn test_trailing_double_slash_rejected() {
        // Would otherwise become the same index.html as the start page
        let result = map("http://example.com/local//", BASE);
        assert!(matches!(result, Err(MirrorError::MalformedUrl { .. })));
        let result = map("http://example.com/local/docs//", BASE);
        assert!(matches!(result, Err(MirrorError::MalformedUrl { .. })));
    }

    #[test]
    fn test_non_http_rejected() {
        let result = map("ftp://example.com/local/file.txt", BASE);
        assert!(matches!(result, Err(MirrorError::MalformedUrl { .. })));
    }

    #[test]
    fn test_external_asset_goes_under_origin_dir() {
        assert_eq!(
            map("https://cdn.example.net/lib/jquery.js", BASE).unwrap(),
            PathBuf::from("_external/https/cdn.example.net_443/lib/jquery.js")
        );
        assert_eq!(
            map("http://cdn.example.net:8080/a.css", BASE).unwrap(),
            PathBuf::from("_external/http/cdn.example.net_8080/a.css")
        );
    }

    #[test]
    fn test_other_port_or_scheme_on_same_host_is_external() {
        assert_eq!(
            map("http://example.com:8080/local/a.html", BASE).unwrap(),
            PathBuf::from("_external/http/example.com_8080/local/a.html")
        );
        assert_eq!(
            map("https://example.com/local/a.html", BASE).unwrap(),
            PathBuf::from("_external/https/example.com_443/local/a.html")
        );
        // The default port written out is still the same origin
        assert_eq!(
            map("http://example.com:80/local/a.html", BASE).unwrap(),
            PathBuf::from("a.html")
        );
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let urls = [
            BASE,
            "http://example.com/local/about",
            "http://example.com/local/a/b/c.png",
            "http://example.com/local/x%20y/",
            "https://cdn.example.net/s.js",
        ];
        for url in urls {
            assert_eq!(map(url, BASE).unwrap(), map(url, BASE).unwrap());
        }
    }

    #[test]
    fn test_distinct_urls_never_collide() {
        let urls = [
            "http://example.com/local/",
            "http://example.com/local/about",
            "http://example.com/local/about/",
            "http://example.com/local/about/team",
            "http://example.com/local/about.css",
            "http://example.com/local/blog/",
            "http://example.com/local/blog/post-1.html",
            "http://example.com/local/blog/post-2.html",
            "http://example.com/local/img/logo.png",
            "http://example.com/local/img/logo.svg",
            "http://example.com/local/x%20y",
            "http://example.com/local/x-y",
            "http://example.com/localfoo/",
            "http://example.com/static/app.js",
            "https://cdn.example.net/static/app.js",
            "http://example.com/local/static/app.js",
            "http://example.com:8080/local/a.html",
            "http://example.com/local/a.html",
            "https://example.com/local/a.html",
            "http://example.com/local/_external/http/cdn.example.net_80/x.js",
            "http://cdn.example.net/x.js",
            "http://example.com/local/_site/static/app.js",
            "http://example.com/local/__site/static/app.js",
            "http://example.com/_site/static/app.js",
        ];

        let mut seen: HashMap<PathBuf, &str> = HashMap::new();
        for url in urls {
            let path = map(url, BASE).unwrap();
            if let Some(previous) = seen.insert(path.clone(), url) {
                panic!("{} and {} both map to {}", previous, url, path.display());
            }
        }
    }

    #[tokio::test]
    async fn test_local_path_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mapper = PathMapper::new(Url::parse(BASE).unwrap(), dir.path());

        let url = Url::parse("http://example.com/local/docs/guide/").unwrap();
        let path = mapper.local_path(&url).await.unwrap();

        assert_eq!(path, dir.path().join("docs/guide/index.html"));
        assert!(dir.path().join("docs/guide").is_dir());

        // Second call is a no-op
        assert_eq!(mapper.local_path(&url).await.unwrap(), path);
    }
}
