//! Service configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! main_branch = "main"
//!
//! [store]
//! concurrency = "version_checked"
//! ```

use mediatree_history::BranchId;
use mediatree_store::{ConcurrencyControl, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid configuration
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaTreeConfig {
    /// Branch created by [`MediaTypeService::init`](crate::MediaTypeService::init)
    pub main_branch: BranchId,
    /// Repository settings
    pub store: StoreConfig,
}

impl Default for MediaTreeConfig {
    fn default() -> Self {
        Self {
            main_branch: BranchId::from("main"),
            store: StoreConfig::default(),
        }
    }
}

impl MediaTreeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With main branch
    #[inline]
    #[must_use]
    pub fn with_main_branch(mut self, branch: impl Into<BranchId>) -> Self {
        self.main_branch = branch.into();
        self
    }

    /// With store settings
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// With concurrency strategy
    #[inline]
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: ConcurrencyControl) -> Self {
        self.store = self.store.with_concurrency(concurrency);
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed TOML or unknown values
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Parse` if its content is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
