//! Command inputs

use mediatree_graph::NodeKey;
use mediatree_history::BranchId;
use mediatree_tree::UserId;
use serde::{Deserialize, Serialize};

/// Create a branch, optionally from another branch's head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBranch {
    pub id: BranchId,
    pub name: String,
    pub owner: UserId,
    pub base: Option<BranchId>,
}

impl CreateBranch {
    /// Create a root branch
    #[must_use]
    pub fn new(id: impl Into<BranchId>, name: impl Into<String>, owner: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
            base: None,
        }
    }

    /// Branch from `base`
    #[must_use]
    pub fn from_base(mut self, base: impl Into<BranchId>) -> Self {
        self.base = Some(base.into());
        self
    }
}

/// Add a media type to a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct AddMediaType<K: NodeKey> {
    pub branch: BranchId,
    pub id: K,
    pub name: String,
}

impl<K: NodeKey> AddMediaType<K> {
    #[must_use]
    pub fn new(branch: impl Into<BranchId>, id: K, name: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            id,
            name: name.into(),
        }
    }
}

/// Make one media type a parent of another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct AddParentToMediaType<K: NodeKey> {
    pub branch: BranchId,
    pub child_id: K,
    pub parent_id: K,
}

impl<K: NodeKey> AddParentToMediaType<K> {
    #[must_use]
    pub fn new(branch: impl Into<BranchId>, child_id: K, parent_id: K) -> Self {
        Self {
            branch: branch.into(),
            child_id,
            parent_id,
        }
    }
}

/// Remove a media type from a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct RemoveMediaType<K: NodeKey> {
    pub branch: BranchId,
    pub id: K,
}

impl<K: NodeKey> RemoveMediaType<K> {
    #[must_use]
    pub fn new(branch: impl Into<BranchId>, id: K) -> Self {
        Self {
            branch: branch.into(),
            id,
        }
    }
}

/// Merge `source` into `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeBranches {
    pub source: BranchId,
    pub target: BranchId,
}

impl MergeBranches {
    #[must_use]
    pub fn new(source: impl Into<BranchId>, target: impl Into<BranchId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}
