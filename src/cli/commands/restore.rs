//! Restore command - restore caches before minikube starts

use crate::cache::{default_state_path, write_hit_state, CacheArtifact};
use crate::cli::args::StateArgs;
use crate::cli::commands::{coordinator, print_hits};
use crate::config::Config;
use crate::error::CacheResult;
use console::style;

/// Execute the restore command
pub async fn execute(args: StateArgs, config: &Config) -> CacheResult<()> {
    let coordinator = coordinator(config)?;

    if !coordinator.enabled() {
        println!("Caching disabled (cache input is not \"true\")");
    }

    let hits = coordinator.restore_caches().await?;

    let state_path = args.state_file.unwrap_or_else(default_state_path);
    write_hit_state(&state_path, &hits).await?;

    if coordinator.enabled() {
        println!("{}", style("Minikube cache restore").bold());
        print_hits(&hits);

        let misses = hits.misses();
        if misses.is_empty() {
            println!("All {} caches restored", CacheArtifact::ALL.len());
        } else {
            println!(
                "{} of {} caches missed, they will be saved after minikube runs",
                misses.len(),
                CacheArtifact::ALL.len()
            );
        }
    }
    Ok(())
}
