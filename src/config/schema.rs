//! Configuration schema for minikube-cache
//!
//! Configuration is stored at `~/.config/minikube-cache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Minikube installation settings
    pub minikube: MinikubeConfig,

    /// Cache store settings
    pub store: StoreConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

impl GeneralConfig {
    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Minikube installation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinikubeConfig {
    /// Binary name or path used to probe the version
    pub binary: String,

    /// Directory containing `.minikube` (defaults to the home directory)
    pub home: Option<PathBuf>,
}

impl Default for MinikubeConfig {
    fn default() -> Self {
        Self {
            binary: "minikube".to_string(),
            home: None,
        }
    }
}

/// Cache store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory of the local store (defaults to the user cache dir)
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured store root, or `{cache_dir}/minikube-cache/store`
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("minikube-cache")
                .join("store")
        })
    }
}
