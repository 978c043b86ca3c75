//! Minikube command execution
//!
//! Probes the installed Minikube version and runs the wrapped command for the
//! `run` lifecycle.

use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Source of the installed tool version used in cache keys
#[async_trait]
pub trait VersionProber: Send + Sync {
    /// Trimmed version string, e.g. `v1.32.0`
    async fn version(&self) -> CacheResult<String>;
}

/// Runs the `minikube` binary
#[derive(Debug, Clone)]
pub struct MinikubeCli {
    binary: String,
}

impl MinikubeCli {
    /// Use the given binary name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Binary name or path this prober runs
    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for MinikubeCli {
    fn default() -> Self {
        Self::new("minikube")
    }
}

#[async_trait]
impl VersionProber for MinikubeCli {
    async fn version(&self) -> CacheResult<String> {
        let command = format!("{} version --short", self.binary);
        debug!("Executing: {}", command);

        let output = Command::new(&self.binary)
            .args(["version", "--short"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CacheError::command_failed(&command, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CacheError::command_exec(command, stderr.trim()));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(CacheError::VersionProbe(format!(
                "`{}` printed no version",
                command
            )));
        }

        debug!(version = %version, "Probed minikube version");
        Ok(version)
    }
}

/// Run a command with inherited stdio, failing on a non-zero exit
pub async fn run_wrapped(command: &[String]) -> CacheResult<()> {
    let Some((program, args)) = command.split_first() else {
        return Err(CacheError::Internal("no command to run".to_string()));
    };

    info!("Running: {}", command.join(" "));

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| CacheError::command_failed(command.join(" "), e))?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(CacheError::WrappedCommand { code }),
        None => Err(CacheError::ProcessSignaled),
    }
}
