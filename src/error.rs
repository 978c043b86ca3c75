//! Error types for minikube-cache
//!
//! All modules use `CacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for minikube-cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur while restoring or saving caches
#[derive(Error, Debug)]
pub enum CacheError {
    // Environment errors
    #[error("Home directory could not be determined")]
    HomeDirNotFound,

    #[error("Minikube version probe failed: {0}")]
    VersionProbe(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Store errors
    #[error("Invalid cache key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Cache entry already exists: {0}")]
    EntryExists(String),

    #[error("Cache entry {key} is corrupt: {reason}")]
    EntryCorrupt { key: String, reason: String },

    #[error("Failed to read hit state {path}: {reason}")]
    StateRead { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    #[error("Wrapped command exited with code {code}")]
    WrappedCommand { code: i32 },

    #[error("Process terminated by signal")]
    ProcessSignaled,

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Exit code to report for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::WrappedCommand { code } => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::VersionProbe(_) | Self::CommandFailed { .. } => {
                Some("Install minikube before this step, or set minikube.binary in the config")
            }
            Self::HomeDirNotFound => Some("Set minikube.home in the config"),
            Self::EntryExists(_) => Some("Entries are immutable; change an input to write a new key"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CacheError::EntryExists("iso-v1.32.0-x64".to_string());
        assert!(err.to_string().contains("already exists"));
        assert!(err.to_string().contains("iso-v1.32.0-x64"));
    }

    #[test]
    fn error_hint() {
        let err = CacheError::VersionProbe("empty output".to_string());
        assert!(err.hint().unwrap().contains("minikube"));
        assert_eq!(CacheError::Internal("x".to_string()).hint(), None);
    }

    #[test]
    fn wrapped_command_exit_code() {
        assert_eq!(CacheError::WrappedCommand { code: 3 }.exit_code(), 3);
        assert_eq!(CacheError::WrappedCommand { code: -1 }.exit_code(), 1);
        assert_eq!(CacheError::WrappedCommand { code: 300 }.exit_code(), 1);
        assert_eq!(CacheError::HomeDirNotFound.exit_code(), 1);
    }
}
