//! Hostname-keyed disk cache for resolved favicons.
//!
//! One file per host holds the raw icon bytes. Freshness comes from the
//! file's modification time; there is no envelope or metadata.
//!
//! Entries whose bytes are the configured default icon ("nothing found")
//! expire after [`DEFAULT_ICON_TTL`] regardless of the configured TTL, so
//! sites that gain a favicon are picked up within half a day.
//!
//! Writes hold an exclusive advisory lock for their duration. Reads take no
//! lock and may observe a file mid-write.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use favicon_core::cache::{DiskCache, content_digest};
//! use favicon_core::parser::normalize;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = DiskCache::new("/var/cache/favicon", "s3cret");
//! let origin = normalize("example.com")?;
//! cache.set(&origin, b"icon-bytes").await?;
//!
//! let default_digest = content_digest(b"default-icon");
//! let hit = cache.get(&origin, &default_digest, Duration::from_secs(86_400)).await;
//! assert_eq!(hit.as_deref(), Some(&b"icon-bytes"[..]));
//! # Ok(())
//! # }
//! ```

mod error;
mod key;

pub use error::CacheError;
pub use key::{HASH_PREFIX_LEN, cache_file_name};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use fs2::FileExt;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::parser::Origin;

/// Freshness window for entries holding the default icon (12 hours).
pub const DEFAULT_ICON_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// SHA-256 of icon bytes, used to recognize default-icon entries.
pub type IconDigest = [u8; 32];

/// Computes the content digest of `bytes`.
#[must_use]
pub fn content_digest(bytes: &[u8]) -> IconDigest {
    let mut digest = [0_u8; 32];
    digest.copy_from_slice(&Sha256::digest(bytes));
    digest
}

/// Returns true when an entry of `age` is still fresh.
#[must_use]
pub fn is_fresh(age: Duration, is_default_icon: bool, ttl: Duration) -> bool {
    let expiry = if is_default_icon { DEFAULT_ICON_TTL } else { ttl };
    age <= expiry
}

/// Disk cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
    hash_key: String,
}

impl DiskCache {
    /// Creates a cache in `dir`; the directory is created lazily on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, hash_key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            hash_key: hash_key.into(),
        }
    }

    /// Cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `origin`.
    #[must_use]
    pub fn entry_path(&self, origin: &Origin) -> PathBuf {
        self.dir.join(cache_file_name(origin.host(), &self.hash_key))
    }

    /// Returns cached bytes for `origin` when present and fresh.
    ///
    /// Absent, unreadable, empty and stale entries are all misses. Stale
    /// entries are left in place to be overwritten by the next `set`.
    #[tracing::instrument(skip(self, default_icon_digest), fields(host = origin.host()))]
    pub async fn get(
        &self,
        origin: &Origin,
        default_icon_digest: &IconDigest,
        ttl: Duration,
    ) -> Option<Vec<u8>> {
        let path = self.entry_path(origin);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "cache miss");
                return None;
            }
        };
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cache entry unreadable");
                return None;
            }
        };
        if bytes.is_empty() {
            debug!(path = %path.display(), "cache entry empty");
            return None;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
            .unwrap_or(Duration::ZERO);
        let is_default_icon = content_digest(&bytes) == *default_icon_digest;

        if is_fresh(age, is_default_icon, ttl) {
            debug!(age_secs = age.as_secs(), is_default_icon, "cache hit");
            Some(bytes)
        } else {
            debug!(age_secs = age.as_secs(), is_default_icon, "cache entry stale");
            None
        }
    }

    /// Writes `bytes` as the entry for `origin`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the directory or file cannot be written or
    /// the exclusive lock cannot be taken.
    #[tracing::instrument(skip(self, bytes), fields(host = origin.host(), bytes = bytes.len()))]
    pub async fn set(&self, origin: &Origin, bytes: &[u8]) -> Result<(), CacheError> {
        let dir = self.dir.clone();
        let path = self.entry_path(origin);
        let bytes = bytes.to_vec();

        tokio::task::spawn_blocking(move || write_locked(&dir, &path, &bytes))
            .await
            .map_err(|source| CacheError::Task { source })?
    }
}

fn write_locked(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    std::fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|e| CacheError::io(path, e))?;

    file.lock_exclusive().map_err(|e| CacheError::lock(path, e))?;
    let written = file
        .set_len(0)
        .and_then(|()| file.write_all(bytes))
        .and_then(|()| file.flush())
        .map_err(|e| CacheError::io(path, e));
    if written.is_err() {
        // No truncated entry may outlive a failed write.
        if let Err(e) = std::fs::remove_file(path) {
            debug!(path = %path.display(), error = %e, "could not remove partial cache entry");
        }
    }
    let unlocked = FileExt::unlock(&file).map_err(|e| CacheError::lock(path, e));

    written?;
    unlocked?;
    trace!(path = %path.display(), "cache entry written");
    Ok(())
}
