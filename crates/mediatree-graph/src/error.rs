//! Error types for graph operations

use crate::key::NodeKey;
use crate::name::NameError;

/// Result alias for graph operations
pub type GraphResult<T, K> = Result<T, GraphError<K>>;

/// Errors raised by [`GraphState`](crate::GraphState)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError<K: NodeKey> {
    /// Id is already present in the graph
    #[error("media type already exists: {0}")]
    AlreadyExists(K),

    /// Id is not present in the graph
    #[error("media type not found: {0}")]
    NotFound(K),

    /// Edge would close a loop; carries the offending path
    #[error("adding this parent would create a cycle: {}", render_path(.0))]
    WillCreateCycle(Vec<K>),

    /// Name failed validation
    #[error("invalid name: {0}")]
    NameInvalid(#[from] NameError),

    /// Structural invariant was already broken
    #[error("graph invariant violated: {0}")]
    Internal(String),
}

impl<K: NodeKey> GraphError<K> {
    /// Check if the caller can recover by changing its input
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    /// Offending path for cycle errors
    #[inline]
    #[must_use]
    pub fn cycle_path(&self) -> Option<&[K]> {
        match self {
            Self::WillCreateCycle(path) => Some(path.as_slice()),
            _ => None,
        }
    }
}

fn render_path<K: NodeKey>(path: &[K]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::MediaTypeId;

    #[test]
    fn cycle_error_display() {
        let err: GraphError<MediaTypeId> =
            GraphError::WillCreateCycle(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(
            err.to_string(),
            "adding this parent would create a cycle: a -> b -> a"
        );
    }

    #[test]
    fn internal_is_not_recoverable() {
        let internal: GraphError<u32> = GraphError::Internal("broken".to_string());
        assert!(!internal.is_recoverable());
        assert!(GraphError::NotFound(1u32).is_recoverable());
    }
}
