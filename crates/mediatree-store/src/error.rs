//! Error types for storage operations

use mediatree_history::{BranchId, CommitId};

/// Result alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by repositories and logs
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No events stored for the branch
    #[error("branch not found: {0}")]
    BranchNotFound(BranchId),

    /// Commit is not in the branch's history
    #[error("commit {commit} not found on branch {branch}")]
    CommitNotFound {
        /// Branch that was searched
        branch: BranchId,
        /// Missing commit
        commit: CommitId,
    },

    /// Another writer appended since the caller loaded the branch
    #[error("version conflict on branch {branch}: expected {expected}, found {actual}")]
    VersionConflict {
        /// Branch that was appended to
        branch: BranchId,
        /// Version the writer loaded
        expected: u64,
        /// Version found in storage
        actual: u64,
    },

    /// Stored events do not replay into a tree
    #[error("failed to replay branch {branch}: {source}")]
    Replay {
        /// Branch whose log failed
        branch: BranchId,
        /// Underlying tree error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a replay failure
    pub fn replay(branch: BranchId, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Replay {
            branch,
            source: Box::new(source),
        }
    }

    /// Check if a branch or commit lookup failed
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BranchNotFound(_) | Self::CommitNotFound { .. })
    }

    /// Check if the error is an optimistic concurrency conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Check if reloading and retrying can succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_conflict()
    }
}
