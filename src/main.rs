//! minikube-cache - Minikube artifact caching for CI
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use minikube_cache::cli::{Cli, Commands};
use minikube_cache::config::ConfigManager;
use minikube_cache::error::CacheResult;
use minikube_cache::supervisor::supervise;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match supervise(run(cli)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> CacheResult<()> {
    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let loaded = config_manager.load().await;

    let json_logs = loaded
        .as_ref()
        .map(|config| config.general.json_logs())
        .unwrap_or(false);
    init_logging(cli.verbose, json_logs);

    let tolerated = cli.command.tolerated_failure();
    let result = match loaded {
        Ok(config) => dispatch(cli.command, &config, &config_manager).await,
        Err(e) => Err(e),
    };

    match (result, tolerated) {
        // Cleanup steps must never fail the job
        (Err(e), Some(step)) => {
            warn!("{} warning: {}", step, e);
            Ok(())
        }
        (result, _) => result,
    }
}

async fn dispatch(
    command: Commands,
    config: &minikube_cache::config::Config,
    config_manager: &ConfigManager,
) -> CacheResult<()> {
    use minikube_cache::cli::commands;

    match command {
        Commands::Restore(args) => commands::restore(args, config).await,
        Commands::Save(args) => commands::save(args, config).await,
        Commands::Post => commands::post(config).await,
        Commands::Run(args) => commands::run(args, config).await,
        Commands::Keys(args) => commands::keys(args, config).await,
        Commands::Config(args) => commands::config(args, config, config_manager).await,
    }
}

/// Default filter for a `-v` count when `RUST_LOG` is unset
fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "minikube_cache=info",
        _ => "minikube_cache=debug",
    }
}

/// Initialize logging: 0 = info, 1+ = debug; `RUST_LOG` overrides both
fn init_logging(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
