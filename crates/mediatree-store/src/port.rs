//! Storage ports
//!
//! [`TreeRepository`] is what command handlers talk to. [`BranchLog`] and
//! [`EventStore`] are the lower-level append-only logs repositories are
//! built on.

use crate::error::StoreError;
use mediatree_graph::NodeKey;
use mediatree_history::{BranchId, CommitId};
use mediatree_tree::{Tree, TreeEvent};

/// Loads and persists branch aggregates
#[async_trait::async_trait]
pub trait TreeRepository<K: NodeKey>: Send + Sync {
    /// Replay the full log of a branch
    async fn get(&self, branch: &BranchId) -> Result<Tree<K>, StoreError>;

    /// Branch as it was right after `commit`
    ///
    /// `commit` may be any commit in the branch's history, including
    /// commits inherited from its base and source commits of merges.
    async fn get_to_commit(&self, branch: &BranchId, commit: CommitId) -> Result<Tree<K>, StoreError>;

    /// Append events, returning the new version
    ///
    /// Fails with `VersionConflict` if the stored version differs from
    /// `expected_version` and version checks are enabled.
    async fn save(&self, branch: &BranchId, expected_version: u64, events: Vec<TreeEvent<K>>) -> Result<u64, StoreError>;

    /// Check if the branch has any events
    async fn exists(&self, branch: &BranchId) -> Result<bool, StoreError>;

    /// Persist a tree's uncommitted events and mark them committed
    ///
    /// On failure the events stay uncommitted.
    async fn commit(&self, tree: &mut Tree<K>) -> Result<u64, StoreError> {
        let expected = tree.committed_version();
        let events = tree.uncommitted_events().to_vec();
        if events.is_empty() {
            return Ok(expected);
        }
        let version = self.save(tree.id(), expected, events).await?;
        tree.mark_committed();
        Ok(version)
    }
}

/// Per-branch append-only event log
#[async_trait::async_trait]
pub trait BranchLog<K: NodeKey>: Send + Sync {
    /// All events of a branch, or `None` if nothing was ever appended
    async fn load(&self, branch: &BranchId) -> Result<Option<Vec<TreeEvent<K>>>, StoreError>;

    /// Append events; `expected` enables the version check
    async fn append(&self, branch: &BranchId, expected: Option<u64>, events: Vec<TreeEvent<K>>) -> Result<u64, StoreError>;

    /// Every branch with at least one event
    async fn branches(&self) -> Result<Vec<BranchId>, StoreError>;
}

/// Single-stream event store for one non-branching tree
#[async_trait::async_trait]
pub trait EventStore<K: NodeKey>: Send + Sync {
    /// Every stored event in order
    async fn get(&self) -> Result<Vec<TreeEvent<K>>, StoreError>;

    /// Append one event
    async fn save(&self, event: TreeEvent<K>) -> Result<(), StoreError>;
}
