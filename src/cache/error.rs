//! Error types for the disk cache.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing cache entries.
///
/// Reads never produce these: an unreadable entry is a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Directory creation or file write failed
    #[error(
        "cache I/O failed for {path}: {source}\n  Suggestion: Check that cache_dir exists and is writable"
    )]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The exclusive write lock could not be taken
    #[error("cannot lock cache file {path}: {source}")]
    Lock {
        /// File that could not be locked
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The blocking write task panicked or was cancelled
    #[error("cache write task failed: {source}")]
    Task {
        /// Join error from the blocking pool
        #[source]
        source: tokio::task::JoinError,
    },
}

impl CacheError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a lock error for `path`.
    pub fn lock(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Lock {
            path: path.into(),
            source,
        }
    }
}
