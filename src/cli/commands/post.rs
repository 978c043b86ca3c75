//! Post command - cleanup-step save of the image cache

use crate::cli::commands::coordinator;
use crate::config::Config;
use crate::error::CacheResult;
use tracing::info;

/// Execute the post command
pub async fn execute(config: &Config) -> CacheResult<()> {
    info!("Running post-action to save Minikube image cache");
    coordinator(config)?.save_post_action_caches().await;
    Ok(())
}
