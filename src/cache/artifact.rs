//! Cacheable Minikube artifacts and per-artifact hit tracking

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the four cacheable outputs under `~/.minikube/cache`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheArtifact {
    /// Minikube VM ISO images
    Iso,
    /// Container-in-container (kic) base image binaries
    Kic,
    /// Preloaded Kubernetes image tarballs
    PreloadedTarball,
    /// Container images loaded into the cluster
    Images,
}

impl CacheArtifact {
    /// All artifacts, in the order they are restored and saved
    pub const ALL: [Self; 4] = [Self::Iso, Self::Kic, Self::PreloadedTarball, Self::Images];

    /// Directory name under the Minikube cache, also the key prefix
    pub fn name(&self) -> &'static str {
        match self {
            Self::Iso => "iso",
            Self::Kic => "kic",
            Self::PreloadedTarball => "preloaded-tarball",
            Self::Images => "images",
        }
    }

    /// Whether the key includes the Kubernetes version and container runtime
    pub fn keyed_by_cluster(&self) -> bool {
        matches!(self, Self::PreloadedTarball)
    }
}

impl fmt::Display for CacheArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Filesystem locations of each artifact's cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    home: PathBuf,
}

impl CacheLayout {
    /// Layout rooted at the directory that contains `.minikube`
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// The directory that contains `.minikube`
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// `{home}/.minikube/cache/{artifact}`
    pub fn path(&self, artifact: CacheArtifact) -> PathBuf {
        self.home
            .join(".minikube")
            .join("cache")
            .join(artifact.name())
    }

    /// Paths handed to the store for one artifact (always exactly one)
    pub fn paths(&self, artifact: CacheArtifact) -> Vec<PathBuf> {
        vec![self.path(artifact)]
    }
}

/// Hit/miss flag per artifact
///
/// Defaults to all hits: an artifact is only treated as a miss once a
/// restore has actually failed to find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHitSet {
    pub iso: bool,
    pub kic: bool,
    pub preload: bool,
    pub images: bool,
    /// Minikube version the restore ran against, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Default for CacheHitSet {
    fn default() -> Self {
        Self::all_hit()
    }
}

impl CacheHitSet {
    /// Every artifact marked as already cached
    pub fn all_hit() -> Self {
        Self {
            iso: true,
            kic: true,
            preload: true,
            images: true,
            version: None,
        }
    }

    /// Hit set used by the post step
    ///
    /// Images are always a miss so anything pulled after the main step is
    /// captured. The rest were handled by the main step's save.
    pub fn post_action() -> Self {
        Self {
            images: false,
            ..Self::all_hit()
        }
    }

    /// Whether the artifact is marked as a hit
    pub fn get(&self, artifact: CacheArtifact) -> bool {
        match artifact {
            CacheArtifact::Iso => self.iso,
            CacheArtifact::Kic => self.kic,
            CacheArtifact::PreloadedTarball => self.preload,
            CacheArtifact::Images => self.images,
        }
    }

    /// Mark the artifact as hit or miss
    pub fn set(&mut self, artifact: CacheArtifact, hit: bool) {
        match artifact {
            CacheArtifact::Iso => self.iso = hit,
            CacheArtifact::Kic => self.kic = hit,
            CacheArtifact::PreloadedTarball => self.preload = hit,
            CacheArtifact::Images => self.images = hit,
        }
    }

    /// Artifacts currently marked as misses
    pub fn misses(&self) -> Vec<CacheArtifact> {
        CacheArtifact::ALL
            .into_iter()
            .filter(|a| !self.get(*a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names() {
        let names: Vec<_> = CacheArtifact::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["iso", "kic", "preloaded-tarball", "images"]);
        assert_eq!(CacheArtifact::PreloadedTarball.to_string(), "preloaded-tarball");
    }

    #[test]
    fn only_preload_is_keyed_by_cluster() {
        for artifact in CacheArtifact::ALL {
            assert_eq!(
                artifact.keyed_by_cluster(),
                artifact == CacheArtifact::PreloadedTarball
            );
        }
    }

    #[test]
    fn layout_paths() {
        let layout = CacheLayout::new("/home/runner");
        assert_eq!(
            layout.path(CacheArtifact::Kic),
            PathBuf::from("/home/runner/.minikube/cache/kic")
        );
        assert_eq!(
            layout.paths(CacheArtifact::PreloadedTarball),
            vec![PathBuf::from("/home/runner/.minikube/cache/preloaded-tarball")]
        );
    }

    #[test]
    fn hit_set_defaults_to_all_hit() {
        let hits = CacheHitSet::default();
        assert!(CacheArtifact::ALL.iter().all(|a| hits.get(*a)));
        assert!(hits.misses().is_empty());
    }

    #[test]
    fn post_action_forces_images_miss() {
        let hits = CacheHitSet::post_action();
        assert!(hits.iso && hits.kic && hits.preload);
        assert!(!hits.images);
        assert_eq!(hits.misses(), vec![CacheArtifact::Images]);
    }

    #[test]
    fn set_and_get() {
        let mut hits = CacheHitSet::all_hit();
        hits.set(CacheArtifact::PreloadedTarball, false);
        assert!(!hits.preload);
        assert!(!hits.get(CacheArtifact::PreloadedTarball));
        assert!(hits.get(CacheArtifact::Iso));
    }

    #[test]
    fn hit_set_json_field_names() {
        let json = serde_json::to_value(CacheHitSet::post_action()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"iso": true, "kic": true, "preload": true, "images": false})
        );

        let parsed: CacheHitSet =
            serde_json::from_str(r#"{"iso":false,"kic":true,"preload":true,"images":true,"version":"v1.32.0"}"#)
                .unwrap();
        assert!(!parsed.iso);
        assert_eq!(parsed.version.as_deref(), Some("v1.32.0"));
    }
}
