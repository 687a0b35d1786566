//! Engine configuration (clazz.toml)
//!
//! ```toml
//! strict-meta = true
//! trait-conflicts = "error"
//! max-inheritance-depth = 32
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// How to resolve two traits providing the same member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraitConflictPolicy {
    /// The trait applied last wins
    #[default]
    LastWins,
    /// Raise `TraitConflict`
    Error,
}

/// Settings of a [`ClassManager`](crate::ClassManager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ManagerConfig {
    /// Reject meta attributes the class kind does not recognize
    pub strict_meta: bool,

    /// Trait member conflict resolution
    pub trait_conflicts: TraitConflictPolicy,

    /// Longest parent chain walked before reporting a cycle
    pub max_inheritance_depth: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            strict_meta: false,
            trait_conflicts: TraitConflictPolicy::LastWins,
            max_inheritance_depth: 64,
        }
    }
}

impl ManagerConfig {
    /// Parse configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ManagerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_inheritance_depth == 0 {
            return Err(ConfigError::ValidationError(
                "max-inheritance-depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
