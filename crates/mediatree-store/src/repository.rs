//! Event-sourced repositories
//!
//! Branches are rebuilt by replaying their log. Creation and merge events
//! reference commits on other branches; those branches are replayed up to
//! the referenced commit first so the new commits can link to them.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::port::{BranchLog, EventStore, TreeRepository};
use futures::future::BoxFuture;
use mediatree_graph::NodeKey;
use mediatree_history::{BranchId, CommitId};
use mediatree_tree::{NoSources, ResolvedSources, Tree, TreeError, TreeEvent};
use std::marker::PhantomData;

/// Repository over a per-branch [`BranchLog`]
#[derive(Debug)]
pub struct EventSourcedRepository<L, K> {
    log: L,
    config: StoreConfig,
    _key: PhantomData<fn() -> K>,
}

impl<L, K> EventSourcedRepository<L, K>
where
    L: BranchLog<K>,
    K: NodeKey,
{
    /// Create repository over `log`
    #[must_use]
    pub fn new(log: L, config: StoreConfig) -> Self {
        Self {
            log,
            config,
            _key: PhantomData,
        }
    }

    /// Underlying log
    #[inline]
    #[must_use]
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Every stored branch
    ///
    /// # Errors
    /// Propagates log failures
    pub async fn branches(&self) -> Result<Vec<BranchId>, StoreError> {
        self.log.branches().await
    }

    /// Replay `branch`, optionally stopping at `upto`
    ///
    /// Commits referenced by the replayed events are resolved into
    /// `resolved`, which is shared across the whole recursive load since a
    /// commit resolves to the same value wherever it is referenced.
    fn load<'a>(
        &'a self,
        branch: BranchId,
        upto: Option<CommitId>,
        resolved: &'a mut ResolvedSources<K>,
    ) -> BoxFuture<'a, Result<Tree<K>, StoreError>> {
        Box::pin(async move {
            let mut events = self
                .log
                .load(&branch)
                .await?
                .ok_or_else(|| StoreError::BranchNotFound(branch.clone()))?;

            // Commits inherited from the base or merged in are not produced by
            // this log; those are cut from the fully replayed history instead
            let mut snapshot = None;
            if let Some(commit) = upto {
                if !events_through(&mut events, commit) {
                    snapshot = Some(commit);
                }
            }

            for source in events.iter().filter_map(TreeEvent::source_ref) {
                if resolved.contains(source) {
                    continue;
                }
                tracing::debug!("resolving {} while loading {}", source, branch);
                let tree = self
                    .load(source.branch_id.clone(), Some(source.commit_id), &mut *resolved)
                    .await?;
                let commit = tree
                    .history()
                    .find(source.commit_id)
                    .ok_or_else(|| StoreError::CommitNotFound {
                        branch: source.branch_id.clone(),
                        commit: source.commit_id,
                    })?;
                resolved.insert(source.clone(), commit);
            }

            let tree = Tree::from_events(branch.clone(), events, &*resolved).map_err(|err| {
                tracing::error!("branch {} does not replay: {}", branch, err);
                StoreError::replay(branch.clone(), err)
            })?;

            match snapshot {
                Some(commit) => {
                    tracing::debug!("cutting {} at commit {} from its history", branch, commit);
                    tree.at_commit(commit).map_err(|err| match err {
                        TreeError::History(_) => StoreError::CommitNotFound { branch, commit },
                        other => StoreError::replay(branch, other),
                    })
                }
                None => Ok(tree),
            }
        })
    }
}

/// Truncate a log after the event that produced `commit`
///
/// A branch whose creation inherited `commit` from its base ends at the
/// creation event. Returns `false`, leaving the log untouched, when no
/// event matches.
fn events_through<K: NodeKey>(events: &mut Vec<TreeEvent<K>>, commit: CommitId) -> bool {
    let end = events.iter().position(|event| match event {
        TreeEvent::TreeCreated { base, .. } => base.as_ref().is_some_and(|b| b.commit_id == commit),
        _ => event.commit_id() == Some(commit),
    });
    match end {
        Some(end) => {
            events.truncate(end + 1);
            true
        }
        None => false,
    }
}

#[async_trait::async_trait]
impl<L, K> TreeRepository<K> for EventSourcedRepository<L, K>
where
    L: BranchLog<K>,
    K: NodeKey,
{
    async fn get(&self, branch: &BranchId) -> Result<Tree<K>, StoreError> {
        let mut resolved = ResolvedSources::new();
        self.load(branch.clone(), None, &mut resolved).await
    }

    async fn get_to_commit(&self, branch: &BranchId, commit: CommitId) -> Result<Tree<K>, StoreError> {
        let mut resolved = ResolvedSources::new();
        self.load(branch.clone(), Some(commit), &mut resolved).await
    }

    async fn save(&self, branch: &BranchId, expected_version: u64, events: Vec<TreeEvent<K>>) -> Result<u64, StoreError> {
        self.log
            .append(branch, self.config.expected(expected_version), events)
            .await
    }

    async fn exists(&self, branch: &BranchId) -> Result<bool, StoreError> {
        Ok(self.log.load(branch).await?.is_some())
    }
}

/// Repository for a single tree kept in one [`EventStore`] stream
///
/// The stream has no branches, so it cannot replay creation from a base or
/// merges; those events fail to load.
#[derive(Debug)]
pub struct SingleStreamRepository<S, K> {
    branch: BranchId,
    store: S,
    config: StoreConfig,
    _key: PhantomData<fn() -> K>,
}

impl<S, K> SingleStreamRepository<S, K>
where
    S: EventStore<K>,
    K: NodeKey,
{
    /// Create repository serving `branch` from `store`
    #[must_use]
    pub fn new(branch: BranchId, store: S, config: StoreConfig) -> Self {
        Self {
            branch,
            store,
            config,
            _key: PhantomData,
        }
    }

    /// The only branch this repository serves
    #[inline]
    #[must_use]
    pub fn branch(&self) -> &BranchId {
        &self.branch
    }

    async fn events(&self, branch: &BranchId) -> Result<Vec<TreeEvent<K>>, StoreError> {
        if branch != &self.branch {
            return Err(StoreError::BranchNotFound(branch.clone()));
        }
        let events = self.store.get().await?;
        if events.is_empty() {
            return Err(StoreError::BranchNotFound(branch.clone()));
        }
        Ok(events)
    }

    fn replay(&self, events: Vec<TreeEvent<K>>) -> Result<Tree<K>, StoreError> {
        Tree::from_events(self.branch.clone(), events, &NoSources)
            .map_err(|err| StoreError::replay(self.branch.clone(), err))
    }
}

#[async_trait::async_trait]
impl<S, K> TreeRepository<K> for SingleStreamRepository<S, K>
where
    S: EventStore<K>,
    K: NodeKey,
{
    async fn get(&self, branch: &BranchId) -> Result<Tree<K>, StoreError> {
        let events = self.events(branch).await?;
        self.replay(events)
    }

    async fn get_to_commit(&self, branch: &BranchId, commit: CommitId) -> Result<Tree<K>, StoreError> {
        // A single stream never branches or merges, so its log produced every commit
        let mut events = self.events(branch).await?;
        if !events_through(&mut events, commit) {
            return Err(StoreError::CommitNotFound {
                branch: branch.clone(),
                commit,
            });
        }
        self.replay(events)
    }

    async fn save(&self, branch: &BranchId, expected_version: u64, events: Vec<TreeEvent<K>>) -> Result<u64, StoreError> {
        if branch != &self.branch {
            return Err(StoreError::BranchNotFound(branch.clone()));
        }

        // Check and append are not atomic; the stream assumes a single writer
        let actual = self.store.get().await?.len() as u64;
        if let Some(expected) = self.config.expected(expected_version) {
            if expected != actual {
                return Err(StoreError::VersionConflict {
                    branch: branch.clone(),
                    expected,
                    actual,
                });
            }
        }

        let count = events.len() as u64;
        for event in events {
            self.store.save(event).await?;
        }
        tracing::debug!("appended {} events to single stream {}", count, branch);
        Ok(actual + count)
    }

    async fn exists(&self, branch: &BranchId) -> Result<bool, StoreError> {
        Ok(branch == &self.branch && !self.store.get().await?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediatree_graph::Name;
    use mediatree_history::SourceCommitRef;

    #[test]
    fn events_through_stops_at_commit() {
        let first = CommitId::new();
        let second = CommitId::new();
        let events: Vec<TreeEvent<u32>> = vec![
            TreeEvent::MediaTypeAdded {
                id: 1,
                name: Name::new("one").unwrap(),
                commit_id: first,
            },
            TreeEvent::MediaTypeAdded {
                id: 2,
                name: Name::new("two").unwrap(),
                commit_id: second,
            },
        ];

        let mut prefix = events.clone();
        assert!(events_through(&mut prefix, first));
        assert_eq!(prefix.len(), 1);

        let mut whole = events.clone();
        assert!(events_through(&mut whole, second));
        assert_eq!(whole.len(), 2);

        let mut untouched = events;
        assert!(!events_through(&mut untouched, CommitId::new()));
        assert_eq!(untouched.len(), 2);
    }

    #[test]
    fn events_through_matches_inherited_base() {
        let base = CommitId::new();
        let events: Vec<TreeEvent<u32>> = vec![
            TreeEvent::TreeCreated {
                name: Name::new("feature").unwrap(),
                owner: "bob".into(),
                base: Some(SourceCommitRef::new("main".into(), base)),
            },
            TreeEvent::MediaTypeAdded {
                id: 2,
                name: Name::new("two").unwrap(),
                commit_id: CommitId::new(),
            },
        ];

        let mut events = events;
        assert!(events_through(&mut events, base));
        assert_eq!(events.len(), 1);
    }
}
