//! Cache storage backends
//!
//! The coordinator only talks to the [`CacheStore`] and [`FsProbe`] traits.
//! [`LocalStore`] keeps entries in a directory on the runner, which suits
//! self-hosted runners with a persistent disk.

mod local;

pub use local::{validate_key, EntryMetadata, LocalStore};

use crate::error::CacheResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Key-value store for cached directories
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Restore `paths` from the entry stored under `key`
    ///
    /// Returns the matched key, or `None` when no entry exists.
    async fn restore(&self, paths: &[PathBuf], key: &str) -> CacheResult<Option<String>>;

    /// Store `paths` under `key`
    async fn save(&self, paths: &[PathBuf], key: &str) -> CacheResult<()>;

    /// Human-readable backend name for display
    fn store_name(&self) -> &'static str;
}

/// Existence checks against the local filesystem
pub trait FsProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// [`FsProbe`] backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FsProbe for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
