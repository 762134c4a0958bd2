//! Three-way structural merge
//!
//! Compares a source graph against the common base and replays what the
//! source added since divergence onto the target graph.

use crate::error::GraphError;
use crate::key::NodeKey;
use crate::name::Name;
use crate::state::GraphState;
use serde::{Deserialize, Serialize};

/// One structural difference carried by a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", bound(deserialize = ""))]
pub enum Change<K: NodeKey> {
    /// Media type created on the source side
    Added {
        /// New media type
        id: K,
        /// Its normalized name
        name: Name,
    },

    /// Media type removed on the source side
    Removed {
        /// Removed media type
        id: K,
    },

    /// Child edge created on the source side
    ParentAdded {
        /// Media type that gained a parent
        child_id: K,
        /// The new parent
        parent_id: K,
    },
}

impl<K: NodeKey> Change<K> {
    /// Apply this change to a graph
    ///
    /// # Errors
    /// Propagates the error of the underlying graph operation
    pub fn apply_to(&self, state: &mut GraphState<K>) -> Result<(), GraphError<K>> {
        match self {
            Self::Added { id, name } => state.insert(id.clone(), name.clone()),
            Self::Removed { id } => state.remove_media_type(id),
            Self::ParentAdded {
                child_id,
                parent_id,
            } => state.add_child_to_media_type(parent_id, child_id),
        }
    }
}

impl<K: NodeKey> GraphState<K> {
    /// Merge `source` into `self` relative to their common `base`
    ///
    /// 1. Nodes in `source` but not in `base` are added. If `self` already
    ///    has such an id, both sides created it independently and the merge
    ///    fails with `AlreadyExists`.
    /// 2. Edges in `source` missing from both `base` and `self` are added
    ///    through the cycle-checked insertion. Edges touching a node that
    ///    `self` no longer has are skipped.
    ///
    /// Removals are not propagated. On error `self` may hold a partial
    /// merge, so callers run this on a clone.
    ///
    /// # Errors
    /// - `GraphError::AlreadyExists` for ids created on both sides
    /// - `GraphError::WillCreateCycle` if a source edge closes a loop here
    pub fn merge(&mut self, source: &Self, base: &Self) -> Result<Vec<Change<K>>, GraphError<K>> {
        let mut changes = Vec::new();

        for node in source.iter() {
            if base.contains(node.id()) {
                continue;
            }
            if self.contains(node.id()) {
                return Err(GraphError::AlreadyExists(node.id().clone()));
            }
            self.insert(node.id().clone(), node.name().clone())?;
            changes.push(Change::Added {
                id: node.id().clone(),
                name: node.name().clone(),
            });
        }

        for node in source.iter() {
            let parent_id = node.id();
            let Some(current) = self.get(parent_id) else {
                continue;
            };
            let base_parent = base.get(parent_id);

            let new_children: Vec<K> = node
                .children()
                .iter()
                .filter(|child| !base_parent.is_some_and(|b| b.has_child(child)))
                .filter(|child| !current.has_child(child))
                .cloned()
                .collect();

            for child_id in new_children {
                if !self.contains(&child_id) {
                    tracing::debug!(
                        "skipping merged edge {} -> {}: child no longer exists",
                        parent_id,
                        child_id
                    );
                    continue;
                }
                self.add_child_to_media_type(parent_id, &child_id)?;
                changes.push(Change::ParentAdded {
                    child_id,
                    parent_id: parent_id.clone(),
                });
            }
        }

        Ok(changes)
    }
}
