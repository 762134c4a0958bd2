//! Immutable commits

use crate::id::CommitId;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// One immutable step in a branch's history
///
/// # Parents
/// - none: root commit
/// - one: ordinary edit, or a merge into a branch that had no head yet
/// - two: merge commit, ordered `[source tip, target tip]`
#[derive(Debug)]
pub struct Commit<E> {
    id: CommitId,
    parents: Vec<Arc<Commit<E>>>,
    merge: bool,
    event: E,
}

impl<E> Commit<E> {
    pub(crate) fn new(id: CommitId, parents: Vec<Arc<Commit<E>>>, merge: bool, event: E) -> Self {
        Self {
            id,
            parents,
            merge,
            event,
        }
    }

    /// Commit identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> CommitId {
        self.id
    }

    /// Parent commits
    #[inline]
    #[must_use]
    pub fn parents(&self) -> &[Arc<Commit<E>>] {
        &self.parents
    }

    /// Payload that produced this commit
    #[inline]
    #[must_use]
    pub fn event(&self) -> &E {
        &self.event
    }

    /// Check if this commit records a merge
    #[inline]
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.merge
    }

    /// Check if this commit has no parents
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Previous commit on the branch that recorded this one
    ///
    /// For merges this is the target tip, which is absent when the target
    /// branch had no commits before the merge.
    #[inline]
    #[must_use]
    pub fn target_parent(&self) -> Option<&Arc<Commit<E>>> {
        if self.merge {
            self.parents.get(1)
        } else {
            self.parents.first()
        }
    }

    /// Breadth-first walk over this commit and all its ancestors
    #[inline]
    #[must_use]
    pub fn ancestors(self: &Arc<Self>) -> Ancestors<E> {
        Ancestors::new(Some(Arc::clone(self)))
    }
}

impl<E> PartialEq for Commit<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for Commit<E> {}

// Unlinks parents iteratively so long histories do not overflow the stack on drop
impl<E> Drop for Commit<E> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.parents);
        while let Some(parent) = pending.pop() {
            if let Ok(mut commit) = Arc::try_unwrap(parent) {
                pending.append(&mut commit.parents);
            }
        }
    }
}

/// Breadth-first ancestor iterator (start commit included, each commit once)
#[derive(Debug)]
pub struct Ancestors<E> {
    queue: VecDeque<Arc<Commit<E>>>,
    seen: HashSet<CommitId>,
}

impl<E> Ancestors<E> {
    pub(crate) fn new(start: Option<Arc<Commit<E>>>) -> Self {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        if let Some(commit) = start {
            seen.insert(commit.id());
            queue.push_back(commit);
        }
        Self { queue, seen }
    }
}

impl<E> Iterator for Ancestors<E> {
    type Item = Arc<Commit<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit = self.queue.pop_front()?;
        for parent in commit.parents() {
            if self.seen.insert(parent.id()) {
                self.queue.push_back(Arc::clone(parent));
            }
        }
        Some(commit)
    }
}
