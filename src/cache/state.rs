//! Hit state handed from the restore step to the save step
//!
//! When restore and save run as separate processes the hit set is written
//! to a JSON file in the runner's temp directory.

use crate::cache::artifact::CacheHitSet;
use crate::error::{CacheError, CacheResult};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const STATE_FILE: &str = "minikube-cache-hits.json";

/// `$RUNNER_TEMP/minikube-cache-hits.json`, falling back to the system temp dir
pub fn default_state_path() -> PathBuf {
    std::env::var_os("RUNNER_TEMP")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(STATE_FILE)
}

/// Write the hit set as JSON
pub async fn write_hit_state(path: &Path, hits: &CacheHitSet) -> CacheResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| CacheError::io(format!("creating directory {}", parent.display()), e))?;
    }

    let content = serde_json::to_string_pretty(hits)?;
    fs::write(path, content)
        .await
        .map_err(|e| CacheError::io(format!("writing hit state to {}", path.display()), e))?;

    debug!("Hit state written to {}", path.display());
    Ok(())
}

/// Read a hit set written by [`write_hit_state`]
///
/// Returns `None` when the file does not exist.
pub async fn read_hit_state(path: &Path) -> CacheResult<Option<CacheHitSet>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CacheError::io(
                format!("reading hit state from {}", path.display()),
                e,
            ))
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| CacheError::StateRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
