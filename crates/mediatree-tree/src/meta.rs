//! Branch metadata

use mediatree_graph::Name;
use mediatree_history::SourceCommitRef;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Owner of a branch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create new user identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Metadata recorded when a branch is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMeta {
    pub(crate) name: Name,
    pub(crate) owner: UserId,
    pub(crate) base: Option<SourceCommitRef>,
}

impl TreeMeta {
    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Owning user
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Commit the branch was created from
    #[inline]
    #[must_use]
    pub fn base(&self) -> Option<&SourceCommitRef> {
        self.base.as_ref()
    }
}
