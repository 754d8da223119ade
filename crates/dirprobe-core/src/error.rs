//! Fatal scan errors.
//!
//! These abort a run before (or, for output failures, during) dispatch.
//! Per-request failures never surface here; see [`crate::probe::FailureKind`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Target has no usable host, even after defaulting the scheme to `https://`.
    #[error("{0} is not a valid URL (e.g. google.com)")]
    InvalidUrl(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Every line of the wordlist is blank after trimming.
    #[error("Wordlist is malformed: {} has no entries", .0.display())]
    EmptyWordlist(PathBuf),

    #[error("failed to read wordlist {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the report failed (e.g. closed stdout).
    #[error("failed to write scan output: {0}")]
    Output(#[from] std::io::Error),

    /// A worker went away without delivering its outcome.
    #[error("worker pool: {0}")]
    WorkerPool(String),
}
