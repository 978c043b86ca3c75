//! Workflow inputs
//!
//! Inputs arrive the way GitHub Actions passes them to an action: one
//! `INPUT_<NAME>` environment variable per input.

use std::env;

/// Input controlling whether any caching happens
pub const CACHE: &str = "cache";
/// Kubernetes version the cluster is started with
pub const KUBERNETES_VERSION: &str = "kubernetes-version";
/// Container runtime the cluster is started with
pub const CONTAINER_RUNTIME: &str = "container-runtime";

pub const DEFAULT_KUBERNETES_VERSION: &str = "stable";
pub const DEFAULT_CONTAINER_RUNTIME: &str = "docker";

/// Source of raw workflow input values
pub trait InputSource: Send + Sync {
    /// Raw value of the named input, empty when unset
    fn get_input(&self, name: &str) -> String;
}

/// Lower-cased input value, or `default` when the input is empty
pub fn input_or_default(inputs: &dyn InputSource, name: &str, default: &str) -> String {
    let value = inputs.get_input(name).to_lowercase();
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Whether the `cache` input is set to `true` (case-insensitive)
pub fn caching_enabled(inputs: &dyn InputSource) -> bool {
    inputs.get_input(CACHE).to_lowercase() == "true"
}

/// Reads inputs from `INPUT_*` environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl EnvInputs {
    /// Environment variable holding the named input
    pub fn variable_name(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for EnvInputs {
    fn get_input(&self, name: &str) -> String {
        env::var(Self::variable_name(name))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

/// Fixed input values, for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct MapInputs(std::collections::HashMap<String, String>);

#[cfg(test)]
impl MapInputs {
    pub(crate) fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
impl InputSource for MapInputs {
    fn get_input(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }
}
