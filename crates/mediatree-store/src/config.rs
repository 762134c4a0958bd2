//! Storage configuration

use serde::{Deserialize, Serialize};

/// How appends guard against concurrent writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyControl {
    /// Reject appends whose expected version is stale
    #[default]
    VersionChecked,
    /// Append unconditionally; last writer wins
    Unchecked,
}

/// Configuration for repositories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Optimistic concurrency strategy
    pub concurrency: ConcurrencyControl,
}

impl StoreConfig {
    /// Set concurrency strategy
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: ConcurrencyControl) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Expected version to pass to the log, if checks are enabled
    #[inline]
    #[must_use]
    pub fn expected(&self, version: u64) -> Option<u64> {
        match self.concurrency {
            ConcurrencyControl::VersionChecked => Some(version),
            ConcurrencyControl::Unchecked => None,
        }
    }
}
