//! Cache key derivation
//!
//! Keys are `{artifact}-{version}-{arch}`, with
//! `-{kubernetes version}-{container runtime}` appended for the preloaded
//! tarball. Architecture names follow Node's `os.arch()` so keys line up with
//! entries written by the JavaScript setup-minikube action.

use crate::cache::artifact::CacheArtifact;
use crate::inputs::{
    input_or_default, InputSource, CONTAINER_RUNTIME, DEFAULT_CONTAINER_RUNTIME,
    DEFAULT_KUBERNETES_VERSION, KUBERNETES_VERSION,
};

/// Cluster inputs folded into the preloaded tarball key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInputs {
    pub kubernetes_version: String,
    pub container_runtime: String,
}

impl ClusterInputs {
    /// Read the cluster inputs, applying their defaults
    pub fn from_inputs(inputs: &dyn InputSource) -> Self {
        Self {
            kubernetes_version: input_or_default(
                inputs,
                KUBERNETES_VERSION,
                DEFAULT_KUBERNETES_VERSION,
            ),
            container_runtime: input_or_default(
                inputs,
                CONTAINER_RUNTIME,
                DEFAULT_CONTAINER_RUNTIME,
            ),
        }
    }
}

/// Map a Rust target architecture to the name Node reports for it
pub fn node_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

/// Architecture of the running host, as used in keys
pub fn host_arch() -> &'static str {
    node_arch(std::env::consts::ARCH)
}

/// Format a key from explicit components
///
/// `cluster` is ignored for every artifact except the preloaded tarball.
pub fn format_key(
    artifact: CacheArtifact,
    version: &str,
    arch: &str,
    cluster: &ClusterInputs,
) -> String {
    let mut key = format!("{}-{}-{}", artifact.name(), version, arch);
    if artifact.keyed_by_cluster() {
        key.push('-');
        key.push_str(&cluster.kubernetes_version);
        key.push('-');
        key.push_str(&cluster.container_runtime);
    }
    key
}

/// Derive the key for an artifact, reading cluster inputs now
pub fn derive_key(
    artifact: CacheArtifact,
    version: &str,
    arch: &str,
    inputs: &dyn InputSource,
) -> String {
    format_key(artifact, version, arch, &ClusterInputs::from_inputs(inputs))
}
