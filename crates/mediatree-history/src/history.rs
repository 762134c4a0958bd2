//! Branch commit history
//!
//! Provides [`CommitHistory`], the head pointer of one branch plus the
//! ancestor queries merges are built on.

use crate::commit::{Ancestors, Commit};
use crate::id::CommitId;
use std::collections::HashSet;
use std::sync::Arc;

/// Errors raised by history queries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// Commit is not reachable from this history's head
    #[error("commit not found in history: {0}")]
    UnknownCommit(CommitId),
}

/// Append-only history of one branch
///
/// Holds the current head; every earlier commit is reachable through
/// parent links. Appending never rewrites existing commits.
#[derive(Debug)]
pub struct CommitHistory<E> {
    head: Option<Arc<Commit<E>>>,
}

impl<E> Clone for CommitHistory<E> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<E> Default for CommitHistory<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> CommitHistory<E> {
    /// Create history without commits
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Create history continuing from an existing commit
    #[inline]
    #[must_use]
    pub fn from_head(head: Option<Arc<Commit<E>>>) -> Self {
        Self { head }
    }

    /// Current head commit
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&Arc<Commit<E>>> {
        self.head.as_ref()
    }

    /// Current head commit id
    #[inline]
    #[must_use]
    pub fn head_id(&self) -> Option<CommitId> {
        self.head.as_ref().map(|c| c.id())
    }

    /// Check if the branch has no commits yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Append a commit whose parent is the current head
    pub fn add_commit(&mut self, id: CommitId, event: E) -> Arc<Commit<E>> {
        let parents = self.head.take().into_iter().collect();
        self.advance(Commit::new(id, parents, false, event))
    }

    /// Append a merge commit with parents `[source, current head]`
    ///
    /// When this branch has no head yet the merge commit has `source` as
    /// its only parent.
    pub fn add_merge_commit(&mut self, id: CommitId, event: E, source: Arc<Commit<E>>) -> Arc<Commit<E>> {
        let mut parents = vec![source];
        parents.extend(self.head.take());
        self.advance(Commit::new(id, parents, true, event))
    }

    fn advance(&mut self, commit: Commit<E>) -> Arc<Commit<E>> {
        let commit = Arc::new(commit);
        self.head = Some(Arc::clone(&commit));
        commit
    }

    /// Breadth-first walk from the head over every ancestor
    #[inline]
    #[must_use]
    pub fn ancestors(&self) -> Ancestors<E> {
        Ancestors::new(self.head.clone())
    }

    /// Find a commit reachable from the head
    #[must_use]
    pub fn find(&self, id: CommitId) -> Option<Arc<Commit<E>>> {
        self.ancestors().find(|c| c.id() == id)
    }

    /// Check if a commit is reachable from the head
    #[inline]
    #[must_use]
    pub fn contains(&self, id: CommitId) -> bool {
        self.find(id).is_some()
    }

    /// Nearest shared commit, as seen from this side
    ///
    /// Collects every ancestor of `other`, then walks this history
    /// breadth-first and returns the first commit found in that set. This
    /// is an approximation: with criss-cross merges the answer depends on
    /// this side's traversal order and need not be a unique lowest common
    /// ancestor.
    #[must_use]
    pub fn last_common_commit(&self, other: &Self) -> Option<Arc<Commit<E>>> {
        let theirs: HashSet<CommitId> = other.ancestors().map(|c| c.id()).collect();
        if theirs.is_empty() {
            return None;
        }
        self.ancestors().find(|c| theirs.contains(&c.id()))
    }

    /// Every ancestor of a commit (inclusive), oldest first
    ///
    /// The order is the reverse of breadth-first discovery from `id`.
    ///
    /// # Errors
    /// Returns `HistoryError::UnknownCommit` if `id` is not reachable
    pub fn commits_to(&self, id: CommitId) -> Result<Vec<Arc<Commit<E>>>, HistoryError> {
        let target = self.find(id).ok_or(HistoryError::UnknownCommit(id))?;
        let mut commits: Vec<_> = target.ancestors().collect();
        commits.reverse();
        Ok(commits)
    }

    /// Commits recorded by the branch line leading to `id`, oldest first
    ///
    /// Follows [`Commit::target_parent`] so merged-in source commits are
    /// skipped; their effect is carried by the merge commit itself.
    /// Replaying these commits in order rebuilds the state at `id`.
    ///
    /// # Errors
    /// Returns `HistoryError::UnknownCommit` if `id` is not reachable
    pub fn lineage_to(&self, id: CommitId) -> Result<Vec<Arc<Commit<E>>>, HistoryError> {
        let target = self.find(id).ok_or(HistoryError::UnknownCommit(id))?;
        Ok(Self::lineage_of(&target))
    }

    /// Branch line leading to `commit`, oldest first
    #[must_use]
    pub fn lineage_of(commit: &Arc<Commit<E>>) -> Vec<Arc<Commit<E>>> {
        let mut lineage = vec![Arc::clone(commit)];
        let mut current = Arc::clone(commit);
        while let Some(parent) = current.target_parent().cloned() {
            lineage.push(Arc::clone(&parent));
            current = parent;
        }
        lineage.reverse();
        lineage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type History = CommitHistory<&'static str>;

    fn events(commits: &[Arc<Commit<&'static str>>]) -> Vec<&'static str> {
        commits.iter().map(|c| *c.event()).collect()
    }

    #[test]
    fn add_commit_links_to_previous_head() {
        let mut history = History::new();
        assert!(history.is_empty());

        let first = history.add_commit(CommitId::new(), "first");
        assert!(first.is_root());

        let second = history.add_commit(CommitId::new(), "second");
        assert_eq!(second.parents().len(), 1);
        assert_eq!(second.parents()[0].id(), first.id());
        assert_eq!(history.head_id(), Some(second.id()));
    }

    #[test]
    fn merge_commit_parents_are_source_then_target() {
        let mut source = History::new();
        let source_tip = source.add_commit(CommitId::new(), "s1");

        let mut target = History::new();
        let target_tip = target.add_commit(CommitId::new(), "t1");

        let merge = target.add_merge_commit(CommitId::new(), "merge", Arc::clone(&source_tip));
        assert!(merge.is_merge());
        assert_eq!(
            merge.parents().iter().map(|c| c.id()).collect::<Vec<_>>(),
            vec![source_tip.id(), target_tip.id()]
        );
    }

    #[test]
    fn merge_into_empty_branch_has_single_parent() {
        let mut source = History::new();
        let tip = source.add_commit(CommitId::new(), "s1");

        let mut target = History::new();
        let merge = target.add_merge_commit(CommitId::new(), "merge", tip);
        assert_eq!(merge.parents().len(), 1);
        assert!(merge.target_parent().is_none());
    }

    #[test]
    fn last_common_commit_after_fork() {
        let mut main = History::new();
        main.add_commit(CommitId::new(), "m1");
        let fork_point = main.add_commit(CommitId::new(), "m2");

        let mut feature = main.clone();
        feature.add_commit(CommitId::new(), "f1");
        main.add_commit(CommitId::new(), "m3");

        let common = main.last_common_commit(&feature).unwrap();
        assert_eq!(common.id(), fork_point.id());
        assert_eq!(feature.last_common_commit(&main).unwrap().id(), fork_point.id());
    }

    #[test]
    fn last_common_commit_of_unrelated_histories_is_none() {
        let mut a = History::new();
        a.add_commit(CommitId::new(), "a");
        let mut b = History::new();
        b.add_commit(CommitId::new(), "b");

        assert!(a.last_common_commit(&b).is_none());
        assert!(a.last_common_commit(&History::new()).is_none());
    }

    #[test]
    fn last_common_commit_after_merge_is_source_tip() {
        let mut main = History::new();
        main.add_commit(CommitId::new(), "m1");
        let mut feature = main.clone();
        let feature_tip = feature.add_commit(CommitId::new(), "f1");

        main.add_commit(CommitId::new(), "m2");
        main.add_merge_commit(CommitId::new(), "merge", Arc::clone(&feature_tip));

        assert_eq!(main.last_common_commit(&feature).unwrap().id(), feature_tip.id());
    }

    #[test]
    fn commits_to_is_oldest_first() {
        let mut history = History::new();
        history.add_commit(CommitId::new(), "one");
        let two = history.add_commit(CommitId::new(), "two");
        history.add_commit(CommitId::new(), "three");

        let commits = history.commits_to(two.id()).unwrap();
        assert_eq!(events(&commits), vec!["one", "two"]);
    }

    #[test]
    fn commits_to_includes_both_merge_sides() {
        let mut main = History::new();
        main.add_commit(CommitId::new(), "root");
        let mut feature = main.clone();
        let tip = feature.add_commit(CommitId::new(), "feature");
        main.add_commit(CommitId::new(), "main");
        let merge = main.add_merge_commit(CommitId::new(), "merge", tip);

        let commits = main.commits_to(merge.id()).unwrap();
        assert_eq!(events(&commits), vec!["root", "main", "feature", "merge"]);
    }

    #[test]
    fn lineage_skips_merged_source_commits() {
        let mut main = History::new();
        main.add_commit(CommitId::new(), "root");
        let mut feature = main.clone();
        let tip = feature.add_commit(CommitId::new(), "feature");
        main.add_commit(CommitId::new(), "main");
        let merge = main.add_merge_commit(CommitId::new(), "merge", tip);

        let lineage = main.lineage_to(merge.id()).unwrap();
        assert_eq!(events(&lineage), vec!["root", "main", "merge"]);
    }

    #[test]
    fn unknown_commit_is_reported() {
        let history = History::new();
        let missing = CommitId::new();
        assert_eq!(
            history.commits_to(missing).unwrap_err(),
            HistoryError::UnknownCommit(missing)
        );
        assert!(history.lineage_to(missing).is_err());
    }
}
