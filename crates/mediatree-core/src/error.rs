//! Service errors and their classification

use mediatree_graph::{GraphError, NodeKey};
use mediatree_history::BranchId;
use mediatree_store::StoreError;
use mediatree_tree::TreeError;
use std::fmt::{self, Display, Formatter};

/// Coarse error category for callers mapping errors to responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input failed validation
    Validation,
    /// Media type, branch or commit does not exist
    NotFound,
    /// Request clashes with existing state or a concurrent writer
    Conflict,
    /// Invariant violation; never recoverable
    Internal,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`MediaTypeService`](crate::MediaTypeService)
#[derive(Debug, thiserror::Error)]
pub enum ServiceError<K: NodeKey> {
    /// Aggregate rejected the command
    #[error(transparent)]
    Tree(#[from] TreeError<K>),

    /// Repository failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Branch id is taken
    #[error("branch already exists: {0}")]
    BranchAlreadyExists(BranchId),
}

impl<K: NodeKey> From<GraphError<K>> for ServiceError<K> {
    fn from(err: GraphError<K>) -> Self {
        Self::Tree(TreeError::Graph(err))
    }
}

impl<K: NodeKey> ServiceError<K> {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Tree(TreeError::Graph(err)) => match err {
                GraphError::NameInvalid(_) => ErrorKind::Validation,
                GraphError::NotFound(_) => ErrorKind::NotFound,
                GraphError::AlreadyExists(_) | GraphError::WillCreateCycle(_) => ErrorKind::Conflict,
                GraphError::Internal(_) => ErrorKind::Internal,
            },
            Self::Tree(TreeError::History(_)) => ErrorKind::NotFound,
            Self::Tree(TreeError::AlreadyCreated(_)) | Self::BranchAlreadyExists(_) => ErrorKind::Conflict,
            Self::Tree(TreeError::UnresolvedSource(_) | TreeError::Internal(_)) => ErrorKind::Internal,
            Self::Store(StoreError::BranchNotFound(_) | StoreError::CommitNotFound { .. }) => ErrorKind::NotFound,
            Self::Store(StoreError::VersionConflict { .. }) => ErrorKind::Conflict,
            Self::Store(StoreError::Replay { .. }) => ErrorKind::Internal,
        }
    }

    /// Check if the caller can recover by changing its input or retrying
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }

    /// Check if reloading the branch and retrying can succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }

    /// Underlying graph error, if any
    #[inline]
    #[must_use]
    pub fn as_graph(&self) -> Option<&GraphError<K>> {
        match self {
            Self::Tree(err) => err.as_graph(),
            _ => None,
        }
    }
}
