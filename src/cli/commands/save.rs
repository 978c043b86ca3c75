//! Save command - save the caches that missed during restore

use crate::cache::{default_state_path, read_hit_state};
use crate::cli::args::StateArgs;
use crate::cli::commands::{coordinator, print_report};
use crate::config::Config;
use crate::error::CacheResult;
use console::style;
use tracing::warn;

/// Execute the save command
pub async fn execute(args: StateArgs, config: &Config) -> CacheResult<()> {
    let coordinator = coordinator(config)?;
    if !coordinator.enabled() {
        return Ok(());
    }

    let state_path = args.state_file.unwrap_or_else(default_state_path);
    let Some(hits) = read_hit_state(&state_path).await? else {
        warn!(
            "No hit state at {}, was restore run? Nothing to save",
            state_path.display()
        );
        return Ok(());
    };

    let report = coordinator.save_caches(&hits).await?;

    println!("{}", style("Minikube cache save").bold());
    print_report(&report);
    Ok(())
}
