//! Directory-backed cache store
//!
//! Layout under the store root:
//!
//! ```text
//! {root}/{key}/entry.json      metadata (key, paths, created_at, size)
//! {root}/{key}/data/{index}/   copy of the index-th cached path
//! {root}/.staging-{uuid}/      in-progress save, renamed into place
//! ```
//!
//! Entries are immutable: saving an existing key fails.

use crate::error::{CacheError, CacheResult};
use crate::store::CacheStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Longest key accepted, matching the hosted Actions cache limit
pub const MAX_KEY_LENGTH: usize = 512;

const METADATA_FILE: &str = "entry.json";
const DATA_DIR: &str = "data";
const STAGING_PREFIX: &str = ".staging-";

/// Reject keys that cannot name a single entry directory
pub fn validate_key(key: &str) -> CacheResult<()> {
    if key.is_empty() {
        return Err(CacheError::invalid_key(key, "key is empty"));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::invalid_key(
            key,
            format!("key is longer than {} characters", MAX_KEY_LENGTH),
        ));
    }
    if key.contains(',') {
        return Err(CacheError::invalid_key(key, "key contains a comma"));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(CacheError::invalid_key(key, "key contains a path separator"));
    }
    if key == "." || key == ".." || key.starts_with(STAGING_PREFIX) {
        return Err(CacheError::invalid_key(key, "key is reserved"));
    }
    Ok(())
}

/// Metadata written next to each stored entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub key: String,
    pub paths: Vec<PathBuf>,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Cache store keeping entries in a local directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root` (created lazily on first save)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Metadata of the entry stored under `key`, if any
    pub async fn metadata(&self, key: &str) -> CacheResult<Option<EntryMetadata>> {
        validate_key(key)?;
        let path = self.entry_dir(key).join(METADATA_FILE);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::io(
                    format!("reading entry metadata {}", path.display()),
                    e,
                ))
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CacheError::EntryCorrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl CacheStore for LocalStore {
    async fn restore(&self, paths: &[PathBuf], key: &str) -> CacheResult<Option<String>> {
        let Some(metadata) = self.metadata(key).await? else {
            debug!(key, "No local cache entry");
            return Ok(None);
        };

        if metadata.paths.len() != paths.len() {
            debug!(
                key,
                stored = metadata.paths.len(),
                requested = paths.len(),
                "Entry stores a different path set, treating as miss"
            );
            return Ok(None);
        }

        let data_dir = self.entry_dir(key).join(DATA_DIR);
        for (index, path) in paths.iter().enumerate() {
            let source = data_dir.join(index.to_string());
            if !source.exists() {
                // Path did not exist when the entry was saved
                continue;
            }
            copy_tree_blocking(source, path.clone()).await?;
        }

        info!(key, "Restored cache from {}", self.root.display());
        Ok(Some(key.to_string()))
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> CacheResult<()> {
        validate_key(key)?;
        let entry_dir = self.entry_dir(key);

        if entry_dir.exists() {
            return Err(CacheError::EntryExists(key.to_string()));
        }

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            CacheError::io(format!("creating store root {}", self.root.display()), e)
        })?;

        let staging = self
            .root
            .join(format!("{}{}", STAGING_PREFIX, Uuid::new_v4()));
        let result = self.stage(paths, key, &staging).await;
        let result = match result {
            Ok(()) => publish(&staging, &entry_dir, key).await,
            Err(e) => Err(e),
        };

        if result.is_err() {
            let _ = tokio::fs::remove_dir_all(&staging).await;
        }
        result
    }

    fn store_name(&self) -> &'static str {
        "local directory"
    }
}

impl LocalStore {
    async fn stage(&self, paths: &[PathBuf], key: &str, staging: &Path) -> CacheResult<()> {
        let data_dir = staging.join(DATA_DIR);
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| CacheError::io(format!("creating {}", data_dir.display()), e))?;

        let mut size_bytes = 0;
        for (index, path) in paths.iter().enumerate() {
            if !path.exists() {
                debug!(key, path = %path.display(), "Skipping missing path");
                continue;
            }
            size_bytes += copy_tree_blocking(path.clone(), data_dir.join(index.to_string())).await?;
        }

        let metadata = EntryMetadata {
            key: key.to_string(),
            paths: paths.to_vec(),
            created_at: Utc::now(),
            size_bytes,
        };
        let metadata_path = staging.join(METADATA_FILE);
        tokio::fs::write(&metadata_path, serde_json::to_vec_pretty(&metadata)?)
            .await
            .map_err(|e| CacheError::io(format!("writing {}", metadata_path.display()), e))?;

        debug!(key, size_bytes, "Staged cache entry");
        Ok(())
    }
}

async fn publish(staging: &Path, entry_dir: &Path, key: &str) -> CacheResult<()> {
    // A concurrent writer may have published the same key since the check
    if entry_dir.exists() {
        return Err(CacheError::EntryExists(key.to_string()));
    }
    tokio::fs::rename(staging, entry_dir).await.map_err(|e| {
        if entry_dir.exists() {
            CacheError::EntryExists(key.to_string())
        } else {
            CacheError::io(format!("publishing entry {}", entry_dir.display()), e)
        }
    })
}

async fn copy_tree_blocking(source: PathBuf, dest: PathBuf) -> CacheResult<u64> {
    let context = format!("copying {} to {}", source.display(), dest.display());
    tokio::task::spawn_blocking(move || copy_tree(&source, &dest))
        .await
        .map_err(|e| CacheError::Internal(format!("copy task failed: {}", e)))?
        .map_err(|e| CacheError::io(context, e))
}

/// Recursively copy `source` to `dest`, returning the bytes copied
fn copy_tree(source: &Path, dest: &Path) -> io::Result<u64> {
    let meta = fs::symlink_metadata(source)?;

    if meta.is_dir() {
        fs::create_dir_all(dest)?;
        let mut total = 0;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            total += copy_tree(&entry.path(), &dest.join(entry.file_name()))?;
        }
        return Ok(total);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    if meta.file_type().is_symlink() {
        copy_symlink(source, dest)?;
        return Ok(0);
    }

    fs::copy(source, dest)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(source)?;
    if fs::symlink_metadata(dest).is_ok() {
        fs::remove_file(dest)?;
    }
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(source, dest).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn key_validation() {
        assert!(validate_key("iso-v1.32.0-x64").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("a,b").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key(".staging-abc").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LENGTH)).is_ok());
        assert!(validate_key(&"k".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }

    #[tokio::test]
    async fn restore_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("store"));
        let paths = vec![dir.path().join("cache/iso")];

        assert_eq!(store.restore(&paths, "iso-v1-x64").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_restore_tree() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("store"));
        let source = dir.path().join("home/.minikube/cache/kic");
        write(&source.join("amd64/kicbase.tar"), "kic-bytes");
        write(&source.join("README"), "hello");

        store.save(&[source.clone()], "kic-v1-x64").await.unwrap();

        let metadata = store.metadata("kic-v1-x64").await.unwrap().unwrap();
        assert_eq!(metadata.key, "kic-v1-x64");
        assert_eq!(metadata.paths, vec![source.clone()]);
        assert_eq!(metadata.size_bytes, 14);

        fs::remove_dir_all(&source).unwrap();
        let restored = store.restore(&[source.clone()], "kic-v1-x64").await.unwrap();

        assert_eq!(restored.as_deref(), Some("kic-v1-x64"));
        assert_eq!(
            fs::read_to_string(source.join("amd64/kicbase.tar")).unwrap(),
            "kic-bytes"
        );
        assert_eq!(fs::read_to_string(source.join("README")).unwrap(), "hello");
    }

    #[tokio::test]
    async fn save_existing_key_fails() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("store"));
        let source = dir.path().join("iso");
        write(&source.join("minikube.iso"), "iso");

        store.save(&[source.clone()], "iso-v1-x64").await.unwrap();
        let err = store.save(&[source], "iso-v1-x64").await.unwrap_err();

        assert!(matches!(err, CacheError::EntryExists(ref k) if k == "iso-v1-x64"));
    }

    #[tokio::test]
    async fn failed_save_leaves_no_staging() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("store");
        let store = LocalStore::new(&root);
        let source = dir.path().join("images");
        write(&source.join("a"), "a");

        store.save(&[source.clone()], "images-v1-x64").await.unwrap();
        assert!(store.save(&[source], "images-v1-x64").await.is_err());

        let leftovers: Vec<_> = fs::read_dir(&root)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(STAGING_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn different_path_count_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("store"));
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        write(&a.join("f"), "f");

        store.save(&[a.clone()], "k").await.unwrap();

        assert_eq!(store.restore(&[a, b], "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_metadata_is_reported() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("store");
        write(&root.join("k").join(METADATA_FILE), "not json");
        let store = LocalStore::new(&root);

        let err = store.metadata("k").await.unwrap_err();
        assert!(matches!(err, CacheError::EntryCorrupt { .. }));
    }

    #[tokio::test]
    async fn invalid_key_rejected_before_io() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("store"));

        let err = store.save(&[dir.path().to_path_buf()], "a/b").await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey { .. }));
        assert!(!dir.path().join("store").exists());
    }
}
