//! minikube-cache - Minikube artifact caching for CI
//!
//! Restores the Minikube ISO, kic base image, preloaded tarball and image
//! caches before a workflow starts minikube, and saves whatever was missed
//! once it has run.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod inputs;
pub mod minikube;
pub mod store;
pub mod supervisor;

pub use error::{CacheError, CacheResult};
