//! Content-addressed suggestion cache
//!
//! One file per fingerprint under the cache root, named by the fingerprint's
//! hex encoding and holding a JSON array of suggestions. Entries are written
//! once and never expire; changed content means a new fingerprint.
//!
//! Writes go to a temporary sibling file that is then renamed over the entry,
//! so a reader sees either no entry or a complete one. Two processes racing on
//! the same fingerprint write identical bytes, so whichever rename lands last
//! is harmless.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::ai::suggestion::{Suggestion, SuggestionSet};
use crate::fingerprint::Fingerprint;

/// Errors from reading or writing cache entries
#[derive(Debug, Error)]
pub enum CacheError {
    /// An I/O error occurred on a cache path
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An entry could not be encoded or decoded
    #[error("cache entry {} is not a valid suggestion list: {reason}", path.display())]
    Serialization { path: PathBuf, reason: String },

    /// The background write task panicked or was cancelled
    #[error("cache write task failed: {reason}")]
    StoreTask { reason: String },
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// An entry exists for the fingerprint (possibly an empty list)
    Hit(SuggestionSet),
    /// No entry exists
    NotCached,
}

/// Suggestion cache rooted at a directory
#[derive(Debug, Clone)]
pub struct SuggestionCache {
    root: PathBuf,
}

impl SuggestionCache {
    /// Open the cache, creating the root directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| CacheError::Io {
            path: root.clone(),
            source,
        })?;
        log::debug!("Suggestion cache at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for a fingerprint
    pub fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(fingerprint.to_hex())
    }

    /// Read the entry for a fingerprint
    ///
    /// A missing entry is `NotCached`; any other read failure, or an entry
    /// that does not decode, is an error.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Result<CacheLookup, CacheError> {
        let path = self.entry_path(fingerprint);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Cache miss for {}", fingerprint);
                return Ok(CacheLookup::NotCached);
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let suggestions: SuggestionSet =
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Serialization {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        log::debug!(
            "Cache hit for {} ({} suggestions)",
            fingerprint,
            suggestions.len()
        );
        Ok(CacheLookup::Hit(suggestions))
    }

    /// Write the entry for a fingerprint and return its path
    pub fn store(
        &self,
        fingerprint: &Fingerprint,
        suggestions: &[Suggestion],
    ) -> Result<PathBuf, CacheError> {
        let path = self.entry_path(fingerprint);
        let content =
            serde_json::to_vec(suggestions).map_err(|e| CacheError::Serialization {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        write_atomic(&path, &content)?;
        log::debug!("Cached {} suggestions at {:?}", suggestions.len(), path);
        Ok(path)
    }

    /// Write the entry on the blocking pool without waiting for it
    ///
    /// Must be called from within a tokio runtime. The returned handle has to
    /// be awaited for the outcome to be observed.
    pub fn spawn_store(
        &self,
        fingerprint: Fingerprint,
        suggestions: SuggestionSet,
    ) -> PendingStore {
        let cache = self.clone();
        let handle = tokio::task::spawn_blocking(move || cache.store(&fingerprint, &suggestions));
        PendingStore { handle }
    }
}

/// A cache write running in the background
#[derive(Debug)]
pub struct PendingStore {
    handle: JoinHandle<Result<PathBuf, CacheError>>,
}

impl PendingStore {
    /// Wait for the write and return its outcome
    pub async fn wait(self) -> Result<PathBuf, CacheError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(CacheError::StoreTask {
                reason: e.to_string(),
            }),
        }
    }
}

/// Write to a temporary sibling, then rename over the target
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), CacheError> {
    let tmp_path = path.with_extension(format!("tmp.{}", std::process::id()));

    fs::write(&tmp_path, content).map_err(|source| CacheError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CacheError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;
