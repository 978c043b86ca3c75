//! Restore/save orchestration
//!
//! The main step restores all four artifacts and records which were hits.
//! After minikube has run, misses whose directory now exists are saved. The
//! post step saves again with only `images` treated as a miss.

use crate::cache::artifact::{CacheArtifact, CacheHitSet, CacheLayout};
use crate::cache::key::derive_key;
use crate::error::CacheResult;
use crate::inputs::{caching_enabled, InputSource};
use crate::minikube::VersionProber;
use crate::store::{CacheStore, FsProbe};
use futures_util::future::{join_all, try_join_all};
use std::fmt;
use tracing::{debug, info, warn};

/// What happened to one artifact during a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Restored earlier, nothing new to store
    AlreadyCached,
    /// Minikube did not populate the directory this run
    PathMissing,
    /// Stored under `key`
    Saved { key: String },
    /// The store rejected the save; logged and ignored
    Failed { key: String, reason: String },
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCached => write!(f, "already cached"),
            Self::PathMissing => write!(f, "path missing"),
            Self::Saved { key } => write!(f, "saved as {}", key),
            Self::Failed { key, reason } => write!(f, "failed to save {}: {}", key, reason),
        }
    }
}

/// Per-artifact outcomes of a save phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub outcomes: Vec<(CacheArtifact, SaveOutcome)>,
}

impl SaveReport {
    /// Number of artifacts actually stored
    pub fn saved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SaveOutcome::Saved { .. }))
            .count()
    }
}

/// Derives cache keys and runs the restore and save phases
pub struct CacheCoordinator {
    store: Box<dyn CacheStore>,
    prober: Box<dyn VersionProber>,
    inputs: Box<dyn InputSource>,
    fs: Box<dyn FsProbe>,
    layout: CacheLayout,
    arch: String,
}

impl CacheCoordinator {
    /// Create a coordinator for the given collaborators
    pub fn new(
        store: Box<dyn CacheStore>,
        prober: Box<dyn VersionProber>,
        inputs: Box<dyn InputSource>,
        fs: Box<dyn FsProbe>,
        layout: CacheLayout,
    ) -> Self {
        Self {
            store,
            prober,
            inputs,
            fs,
            layout,
            arch: crate::cache::key::host_arch().to_string(),
        }
    }

    /// Override the architecture used in keys
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Whether the `cache` input enables caching
    pub fn enabled(&self) -> bool {
        caching_enabled(self.inputs.as_ref())
    }

    /// Cache directory layout
    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Key for an artifact; cluster inputs are read on every call
    pub fn cache_key(&self, artifact: CacheArtifact, version: &str) -> String {
        derive_key(artifact, version, &self.arch, self.inputs.as_ref())
    }

    /// Probe the installed minikube version
    pub async fn version(&self) -> CacheResult<String> {
        self.prober.version().await
    }

    /// Restore every artifact concurrently
    ///
    /// Returns all hits without touching the store when caching is disabled.
    /// A failed version probe or restore propagates.
    pub async fn restore_caches(&self) -> CacheResult<CacheHitSet> {
        let mut hits = CacheHitSet::all_hit();
        if !self.enabled() {
            debug!("Caching disabled, skipping restore");
            return Ok(hits);
        }

        let version = self.version().await?;
        let restores = CacheArtifact::ALL
            .into_iter()
            .map(|artifact| self.restore_cache(artifact, &version));
        let results = try_join_all(restores).await?;

        for (artifact, hit) in CacheArtifact::ALL.into_iter().zip(results) {
            hits.set(artifact, hit);
        }
        hits.version = Some(version);

        info!(
            iso = hits.iso,
            kic = hits.kic,
            preload = hits.preload,
            images = hits.images,
            "Cache restore finished"
        );
        Ok(hits)
    }

    async fn restore_cache(&self, artifact: CacheArtifact, version: &str) -> CacheResult<bool> {
        let key = self.cache_key(artifact, version);
        let matched = self
            .store
            .restore(&self.layout.paths(artifact), &key)
            .await?;

        if matched.is_some() {
            info!(artifact = %artifact, key = %key, "Cache hit");
        } else {
            info!(artifact = %artifact, key = %key, "Cache miss");
        }
        Ok(matched.is_some())
    }

    /// Save every missed artifact whose directory exists
    ///
    /// Saves run concurrently. A failed save is logged and recorded in the
    /// report; only a failed version probe is returned as an error.
    pub async fn save_caches(&self, hits: &CacheHitSet) -> CacheResult<SaveReport> {
        if !self.enabled() {
            debug!("Caching disabled, skipping save");
            return Ok(SaveReport::default());
        }

        let version = self.version().await?;
        if let Some(restored) = hits.version.as_deref() {
            if restored != version {
                warn!(
                    restored = %restored,
                    current = %version,
                    "Minikube version changed since restore, saving under the current version"
                );
            }
        }

        let saves = CacheArtifact::ALL
            .into_iter()
            .map(|artifact| self.save_cache(artifact, hits.get(artifact), &version));
        let outcomes = join_all(saves).await;

        Ok(SaveReport {
            outcomes: CacheArtifact::ALL.into_iter().zip(outcomes).collect(),
        })
    }

    async fn save_cache(&self, artifact: CacheArtifact, hit: bool, version: &str) -> SaveOutcome {
        if hit {
            return SaveOutcome::AlreadyCached;
        }

        let paths = self.layout.paths(artifact);
        if !self.fs.exists(&paths[0]) {
            debug!(artifact = %artifact, path = %paths[0].display(), "Nothing to save");
            return SaveOutcome::PathMissing;
        }

        let key = self.cache_key(artifact, version);
        match self.store.save(&paths, &key).await {
            Ok(()) => {
                info!("Saved cache {} under key {}", artifact, key);
                SaveOutcome::Saved { key }
            }
            Err(e) => {
                warn!(artifact = %artifact, key = %key, "Failed to save cache: {}", e);
                SaveOutcome::Failed {
                    key,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Save from the post step, capturing images pulled after the main step
    ///
    /// Never fails: any error is logged as a warning.
    pub async fn save_post_action_caches(&self) {
        if !self.enabled() {
            return;
        }
        info!("Saving Minikube caches from post action");

        match self.save_caches(&CacheHitSet::post_action()).await {
            Ok(report) => info!(
                saved = report.saved(),
                "Minikube caches saved from post action"
            ),
            Err(e) => warn!("Post-action warning: {}", e),
        }
    }
}
