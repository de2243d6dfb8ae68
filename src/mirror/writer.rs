// src/mirror/writer.rs
// =============================================================================
// This module saves downloaded bytes to disk.
//
// Files are never overwritten. If the destination already exists (from an
// earlier run, or from another URL that maps to the same file) the write is
// skipped. Creating the file with `create_new` makes the existence check and
// the creation one step, so two workers can't both write the same file.
//
// Rust concepts:
// - tokio::fs: async versions of std::fs functions
// - AsyncWriteExt: trait that adds write_all() to async files
// =============================================================================

use crate::error::{MirrorError, MirrorResult};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// What happened to a write request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File created, this many bytes written
    Written(usize),
    /// File was already there, left untouched
    Skipped,
}

/// Returns true if something already exists at `path`
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

// Writes `bytes` to `path` unless the file already exists
//
// The parent directory must exist (PathMapper::local_path creates it).
// A file left half-written by an I/O error is removed again, so the next
// run doesn't mistake it for a finished download.
pub async fn write_if_absent(path: &Path, bytes: &[u8]) -> MirrorResult<WriteOutcome> {
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::Skipped),
        Err(source) => {
            return Err(MirrorError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let result = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if let Err(source) = result {
        drop(file);
        let _ = tokio::fs::remove_file(path).await;
        return Err(MirrorError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(WriteOutcome::Written(bytes.len()))
}
