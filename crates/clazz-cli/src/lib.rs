//! Clazz command-line tool
//!
//! Loads class manifests into a [`ClassManager`] and checks, describes or
//! instantiates the declared classes.

pub mod commands;
pub mod manifest;
pub mod output;

use std::path::Path;

use anyhow::Context;
use clazz_engine::{ClassManager, ManagerConfig};

use crate::manifest::ClassManifest;

/// Load the engine configuration, or defaults when no file is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ManagerConfig> {
    match path {
        Some(path) => ManagerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ManagerConfig::default()),
    }
}

/// Parse a manifest and register every class it declares
pub fn load_manager(
    manifest: &Path,
    config: ManagerConfig,
) -> anyhow::Result<(ClassManager, ClassManifest)> {
    let parsed = ClassManifest::from_file(manifest)
        .with_context(|| format!("loading manifest {}", manifest.display()))?;
    let manager = ClassManager::with_config(config);
    parsed.register(&manager)?;
    tracing::debug!(classes = manager.len(), "manifest registered");
    Ok((manager, parsed))
}
