//! In-memory log adapters

use crate::error::StoreError;
use crate::port::{BranchLog, EventStore};
use mediatree_graph::NodeKey;
use mediatree_history::BranchId;
use mediatree_tree::TreeEvent;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

/// Branch logs held in process memory
#[derive(Debug)]
pub struct InMemoryBranchLog<K: NodeKey> {
    logs: RwLock<HashMap<BranchId, Vec<TreeEvent<K>>>>,
}

impl<K: NodeKey> Default for InMemoryBranchLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> InMemoryBranchLog<K> {
    /// Create empty log set
    #[must_use]
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of events stored for a branch
    #[must_use]
    pub fn len(&self, branch: &BranchId) -> usize {
        self.logs.read().get(branch).map_or(0, Vec::len)
    }
}

#[async_trait::async_trait]
impl<K: NodeKey> BranchLog<K> for InMemoryBranchLog<K> {
    async fn load(&self, branch: &BranchId) -> Result<Option<Vec<TreeEvent<K>>>, StoreError> {
        Ok(self.logs.read().get(branch).cloned())
    }

    async fn append(&self, branch: &BranchId, expected: Option<u64>, events: Vec<TreeEvent<K>>) -> Result<u64, StoreError> {
        let mut logs = self.logs.write();
        let actual = logs.get(branch).map_or(0, |log| log.len() as u64);

        if let Some(expected) = expected {
            if expected != actual {
                tracing::warn!(
                    "rejected append to {}: expected version {}, found {}",
                    branch,
                    expected,
                    actual
                );
                return Err(StoreError::VersionConflict {
                    branch: branch.clone(),
                    expected,
                    actual,
                });
            }
        }
        if events.is_empty() {
            return Ok(actual);
        }

        let count = events.len();
        let log = logs.entry(branch.clone()).or_default();
        log.extend(events);
        tracing::debug!("appended {} events to {} (version {})", count, branch, log.len());
        Ok(log.len() as u64)
    }

    async fn branches(&self) -> Result<Vec<BranchId>, StoreError> {
        let mut branches: Vec<_> = self.logs.read().keys().cloned().collect();
        branches.sort();
        Ok(branches)
    }
}

/// Single event stream held in process memory
#[derive(Debug)]
pub struct InMemoryEventStore<K: NodeKey> {
    events: Mutex<Vec<TreeEvent<K>>>,
}

impl<K: NodeKey> Default for InMemoryEventStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> InMemoryEventStore<K> {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl<K: NodeKey> EventStore<K> for InMemoryEventStore<K> {
    async fn get(&self) -> Result<Vec<TreeEvent<K>>, StoreError> {
        Ok(self.events.lock().clone())
    }

    async fn save(&self, event: TreeEvent<K>) -> Result<(), StoreError> {
        self.events.lock().push(event);
        Ok(())
    }
}
