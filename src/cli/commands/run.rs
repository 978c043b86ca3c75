//! Run command - restore, run a command, then save

use crate::cli::args::RunArgs;
use crate::cli::commands::{coordinator, print_hits, print_report};
use crate::config::Config;
use crate::error::CacheResult;
use crate::minikube::run_wrapped;
use console::style;
use tracing::warn;

/// Execute the run command
///
/// The save is skipped when the wrapped command fails so a half-populated
/// cache directory is never stored.
pub async fn execute(args: RunArgs, config: &Config) -> CacheResult<()> {
    let coordinator = coordinator(config)?;

    let hits = coordinator.restore_caches().await?;
    if coordinator.enabled() {
        println!("{}", style("Minikube cache restore").bold());
        print_hits(&hits);
    }

    run_wrapped(&args.command).await?;

    match coordinator.save_caches(&hits).await {
        Ok(report) if coordinator.enabled() => {
            println!("{}", style("Minikube cache save").bold());
            print_report(&report);
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to save caches: {}", e),
    }
    Ok(())
}
