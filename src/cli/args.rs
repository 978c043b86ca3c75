//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// minikube-cache - Minikube artifact caching for CI
///
/// Restores the Minikube ISO, kic base image, preloaded tarball and image
/// caches before minikube starts, and saves the ones that were missed.
#[derive(Parser, Debug)]
#[command(name = "minikube-cache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MINIKUBE_CACHE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore cached artifacts before minikube starts
    Restore(StateArgs),

    /// Save artifacts that missed during restore
    Save(StateArgs),

    /// Post-step save: capture images pulled during the job
    Post,

    /// Restore, run a command, then save
    Run(RunArgs),

    /// Show the cache key and path of every artifact
    Keys(KeysArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

impl Commands {
    /// Cleanup commands log failures instead of failing the job.
    /// Returns the step name used in the warning.
    pub fn tolerated_failure(&self) -> Option<&'static str> {
        match self {
            Self::Save(_) => Some("Cache save"),
            Self::Post => Some("Post-action"),
            _ => None,
        }
    }
}

/// Arguments shared by restore and save
#[derive(Parser, Debug)]
pub struct StateArgs {
    /// Hit state file handed from restore to save
    /// [default: $RUNNER_TEMP/minikube-cache-hits.json]
    #[arg(long, env = "MINIKUBE_CACHE_STATE")]
    pub state_file: Option<PathBuf>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Command and arguments to run between restore and save
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Arguments for the keys command
#[derive(Parser, Debug)]
pub struct KeysArgs {
    /// Use this version instead of probing minikube
    #[arg(long)]
    pub minikube_version: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., minikube.binary)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for the keys command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one key per line)
    Plain,
}
