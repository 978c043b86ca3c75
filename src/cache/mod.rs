//! Minikube artifact caching
//!
//! Four artifacts under `~/.minikube/cache` are cached independently:
//!
//! | Artifact | Key |
//! |----------|-----|
//! | iso | `iso-{version}-{arch}` |
//! | kic | `kic-{version}-{arch}` |
//! | preloaded-tarball | `preloaded-tarball-{version}-{arch}-{k8s}-{runtime}` |
//! | images | `images-{version}-{arch}` |
//!
//! Entries are never overwritten. A key changes whenever one of its inputs
//! does, so a stale entry is simply never matched again.

pub mod artifact;
pub mod coordinator;
pub mod key;
pub mod state;

pub use artifact::{CacheArtifact, CacheHitSet, CacheLayout};
pub use coordinator::{CacheCoordinator, SaveOutcome, SaveReport};
pub use key::{derive_key, format_key, host_arch, node_arch, ClusterInputs};
pub use state::{default_state_path, read_hit_state, write_hit_state};
