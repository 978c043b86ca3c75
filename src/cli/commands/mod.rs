//! CLI command implementations

pub mod config;
pub mod keys;
pub mod post;
pub mod restore;
pub mod run;
pub mod save;

pub use config::execute as config;
pub use keys::execute as keys;
pub use post::execute as post;
pub use restore::execute as restore;
pub use run::execute as run;
pub use save::execute as save;

use crate::cache::{CacheArtifact, CacheCoordinator, CacheHitSet, SaveOutcome, SaveReport};
use crate::config::{cache_layout, Config};
use crate::error::CacheResult;
use crate::inputs::EnvInputs;
use crate::minikube::MinikubeCli;
use crate::store::{CacheStore, LocalStore, RealFs};
use console::{style, Emoji};
use tracing::debug;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static MISS: Emoji<'_, '_> = Emoji("○ ", "[MISS] ");
static SKIP: Emoji<'_, '_> = Emoji("- ", "[SKIP] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Build a coordinator wired to the configured store, minikube and inputs
pub(crate) fn coordinator(config: &Config) -> CacheResult<CacheCoordinator> {
    let store = LocalStore::new(config.store.resolved_dir());
    debug!(
        "Using {} cache store at {}",
        store.store_name(),
        store.root().display()
    );

    let minikube = MinikubeCli::new(config.minikube.binary.clone());
    let layout = cache_layout(config)?;
    debug!(
        "Probing {} for the version, minikube home {}",
        minikube.binary(),
        layout.home().display()
    );

    Ok(CacheCoordinator::new(
        Box::new(store),
        Box::new(minikube),
        Box::new(EnvInputs),
        Box::new(RealFs),
        layout,
    ))
}

/// Print one line per artifact with its restore result
pub(crate) fn print_hits(hits: &CacheHitSet) {
    for artifact in CacheArtifact::ALL {
        if hits.get(artifact) {
            println!("  {}{}", CHECK, artifact);
        } else {
            println!("  {}{} {}", MISS, artifact, style("(miss)").dim());
        }
    }
}

/// Print one line per artifact with its save outcome
pub(crate) fn print_report(report: &SaveReport) {
    for (artifact, outcome) in &report.outcomes {
        match outcome {
            SaveOutcome::Saved { .. } => {
                println!("  {}{} {}", CHECK, artifact, style(outcome).dim())
            }
            SaveOutcome::Failed { .. } => {
                println!("  {}{} {}", WARN, artifact, style(outcome).yellow())
            }
            SaveOutcome::AlreadyCached | SaveOutcome::PathMissing => {
                println!("  {}{} {}", SKIP, artifact, style(outcome).dim())
            }
        }
    }
}
