//! Error types for tree commands and replay

use mediatree_graph::{GraphError, NodeKey};
use mediatree_history::{BranchId, HistoryError, SourceCommitRef};

/// Result alias for tree operations
pub type TreeResult<T, K> = Result<T, TreeError<K>>;

/// Errors raised by [`Tree`](crate::Tree)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError<K: NodeKey> {
    /// Graph rejected the operation
    #[error(transparent)]
    Graph(#[from] GraphError<K>),

    /// Commit lookup failed
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Branch was already created or already has commits
    #[error("branch already created: {0}")]
    AlreadyCreated(BranchId),

    /// Event references a commit that was not supplied for replay
    #[error("source commit not available: {0}")]
    UnresolvedSource(SourceCommitRef),

    /// Validated event failed to apply, or stored history does not replay
    #[error("tree invariant violated: {0}")]
    Internal(String),
}

impl<K: NodeKey> TreeError<K> {
    /// Check if the caller can recover by changing its input
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Graph(err) => err.is_recoverable(),
            Self::History(_) | Self::AlreadyCreated(_) => true,
            Self::UnresolvedSource(_) | Self::Internal(_) => false,
        }
    }

    /// Underlying graph error, if any
    #[inline]
    #[must_use]
    pub fn as_graph(&self) -> Option<&GraphError<K>> {
        match self {
            Self::Graph(err) => Some(err),
            _ => None,
        }
    }
}
