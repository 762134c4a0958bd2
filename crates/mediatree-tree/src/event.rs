//! Domain events recorded by a tree

use crate::meta::UserId;
use mediatree_graph::{Change, GraphError, GraphState, Name, NodeKey};
use mediatree_history::{CommitId, SourceCommitRef};
use serde::{Deserialize, Serialize};

/// Everything that can happen to a tree
///
/// Serialized with a `type` tag and stable snake_case field names. Every
/// variant except [`TreeEvent::TreeCreated`] produces exactly one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", bound(deserialize = ""))]
pub enum TreeEvent<K: NodeKey> {
    /// Branch was created, optionally from another branch's commit
    TreeCreated {
        /// Display name
        name: Name,
        /// Creating user
        owner: UserId,
        /// Head of the base branch at creation, if it had one
        base: Option<SourceCommitRef>,
    },

    /// Media type was added
    MediaTypeAdded {
        /// New media type
        id: K,
        /// Its normalized name
        name: Name,
        /// Commit produced
        commit_id: CommitId,
    },

    /// Media type was removed and its children re-parented
    MediaTypeRemoved {
        /// Removed media type
        id: K,
        /// Commit produced
        commit_id: CommitId,
    },

    /// Child edge was added
    ParentAddedToMediaType {
        /// Media type that gained a parent
        child_id: K,
        /// The new parent
        parent_id: K,
        /// Commit produced
        commit_id: CommitId,
    },

    /// Another branch was merged in
    TreesMerged {
        /// Structural changes applied to this branch, in order
        changes: Vec<Change<K>>,
        /// Tip of the merged branch
        source: SourceCommitRef,
        /// Merge commit produced
        commit_id: CommitId,
    },
}

impl<K: NodeKey> TreeEvent<K> {
    /// Commit produced by this event
    #[must_use]
    pub fn commit_id(&self) -> Option<CommitId> {
        match self {
            Self::TreeCreated { .. } => None,
            Self::MediaTypeAdded { commit_id, .. }
            | Self::MediaTypeRemoved { commit_id, .. }
            | Self::ParentAddedToMediaType { commit_id, .. }
            | Self::TreesMerged { commit_id, .. } => Some(*commit_id),
        }
    }

    /// Commit on another branch this event depends on
    ///
    /// The creation base for `TreeCreated`, the merged tip for `TreesMerged`.
    #[must_use]
    pub fn source_ref(&self) -> Option<&SourceCommitRef> {
        match self {
            Self::TreeCreated { base, .. } => base.as_ref(),
            Self::TreesMerged { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Check if this event records a merge
    #[inline]
    #[must_use]
    pub fn is_merge(&self) -> bool {
        matches!(self, Self::TreesMerged { .. })
    }

    /// Stable event name, matching the serialized `type` tag
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TreeCreated { .. } => "tree_created",
            Self::MediaTypeAdded { .. } => "media_type_added",
            Self::MediaTypeRemoved { .. } => "media_type_removed",
            Self::ParentAddedToMediaType { .. } => "parent_added_to_media_type",
            Self::TreesMerged { .. } => "trees_merged",
        }
    }

    /// Apply the graph effect of this event
    ///
    /// `TreeCreated` has no graph effect of its own. A merge applies its
    /// changes in order and may leave `state` partially updated on error.
    ///
    /// # Errors
    /// Propagates the error of the underlying graph operation
    pub fn apply_to(&self, state: &mut GraphState<K>) -> Result<(), GraphError<K>> {
        match self {
            Self::TreeCreated { .. } => Ok(()),
            Self::MediaTypeAdded { id, name, .. } => state.insert(id.clone(), name.clone()),
            Self::MediaTypeRemoved { id, .. } => state.remove_media_type(id),
            Self::ParentAddedToMediaType {
                child_id,
                parent_id,
                ..
            } => state.add_child_to_media_type(parent_id, child_id),
            Self::TreesMerged { changes, .. } => changes.iter().try_for_each(|c| c.apply_to(state)),
        }
    }
}
