//! Resolution of commits that live on other branches
//!
//! Replaying a branch that was created from, or merged with, another branch
//! needs the other branch's commit so the new commit can link to it.

use crate::event::TreeEvent;
use mediatree_graph::NodeKey;
use mediatree_history::{Commit, SourceCommitRef};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared commit carrying a tree event
pub type TreeCommit<K> = Arc<Commit<TreeEvent<K>>>;

/// Looks up commits referenced by merge and creation events
pub trait CommitSource<K: NodeKey> {
    /// Commit addressed by `source`, if known
    fn resolve(&self, source: &SourceCommitRef) -> Option<TreeCommit<K>>;
}

/// Source that knows no commits, for branches without cross-branch events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSources;

impl<K: NodeKey> CommitSource<K> for NoSources {
    fn resolve(&self, _source: &SourceCommitRef) -> Option<TreeCommit<K>> {
        None
    }
}

/// Commits collected ahead of replay
#[derive(Debug)]
pub struct ResolvedSources<K: NodeKey> {
    commits: HashMap<SourceCommitRef, TreeCommit<K>>,
}

impl<K: NodeKey> Default for ResolvedSources<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> ResolvedSources<K> {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            commits: HashMap::new(),
        }
    }

    /// Set holding a single commit
    #[must_use]
    pub fn single(source: SourceCommitRef, commit: TreeCommit<K>) -> Self {
        let mut sources = Self::new();
        sources.insert(source, commit);
        sources
    }

    /// Register a commit
    pub fn insert(&mut self, source: SourceCommitRef, commit: TreeCommit<K>) {
        self.commits.insert(source, commit);
    }

    /// Check if a reference is already resolved
    #[inline]
    #[must_use]
    pub fn contains(&self, source: &SourceCommitRef) -> bool {
        self.commits.contains_key(source)
    }

    /// Number of resolved commits
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Check if nothing is resolved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl<K: NodeKey> CommitSource<K> for ResolvedSources<K> {
    fn resolve(&self, source: &SourceCommitRef) -> Option<TreeCommit<K>> {
        self.commits.get(source).cloned()
    }
}
