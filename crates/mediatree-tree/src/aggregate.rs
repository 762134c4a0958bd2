//! Tree aggregate
//!
//! A branch's graph and commit history, rebuilt from its event log and
//! extended by validated commands.

use crate::error::TreeError;
use crate::event::TreeEvent;
use crate::meta::{TreeMeta, UserId};
use crate::source::{CommitSource, NoSources, ResolvedSources, TreeCommit};
use mediatree_graph::{GraphError, GraphState, MediaTypeNode, Name, NodeKey};
use mediatree_history::{BranchId, CommitHistory, CommitId, HistoryError, SourceCommitRef};

/// One branch of the media type hierarchy
///
/// Commands validate against a clone of the graph and only then record an
/// event, so a failed command leaves the tree untouched. Recorded events
/// stay in the uncommitted buffer until the caller persists them.
#[derive(Debug, Clone)]
pub struct Tree<K: NodeKey> {
    id: BranchId,
    meta: Option<TreeMeta>,
    state: GraphState<K>,
    history: CommitHistory<TreeEvent<K>>,
    uncommitted: Vec<TreeEvent<K>>,
    version: u64,
}

impl<K: NodeKey> Tree<K> {
    /// Create an uninitialized tree
    #[must_use]
    pub fn new(id: BranchId) -> Self {
        Self {
            id,
            meta: None,
            state: GraphState::new(),
            history: CommitHistory::new(),
            uncommitted: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a tree by replaying its event log
    ///
    /// `sources` must resolve every commit referenced by creation and merge
    /// events. Replayed events count towards [`Tree::version`] and are
    /// not uncommitted.
    ///
    /// # Errors
    /// - `TreeError::UnresolvedSource` if a referenced commit is missing
    /// - `TreeError::Graph` if an event does not apply to the replayed state
    pub fn from_events<I>(id: BranchId, events: I, sources: &impl CommitSource<K>) -> Result<Self, TreeError<K>>
    where
        I: IntoIterator<Item = TreeEvent<K>>,
    {
        let mut tree = Self::new(id);
        for event in events {
            tree.apply(event, sources)?;
        }
        tracing::debug!("replayed branch {} to version {}", tree.id, tree.version);
        Ok(tree)
    }

    /// Branch identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &BranchId {
        &self.id
    }

    /// Creation metadata, absent until `create` ran
    #[inline]
    #[must_use]
    pub fn meta(&self) -> Option<&TreeMeta> {
        self.meta.as_ref()
    }

    /// Current graph
    #[inline]
    #[must_use]
    pub fn state(&self) -> &GraphState<K> {
        &self.state
    }

    /// Commit history of this branch
    #[inline]
    #[must_use]
    pub fn history(&self) -> &CommitHistory<TreeEvent<K>> {
        &self.history
    }

    /// Current head commit
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&TreeCommit<K>> {
        self.history.head()
    }

    /// Number of applied events, committed or not
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of events already persisted
    #[inline]
    #[must_use]
    pub fn committed_version(&self) -> u64 {
        self.version - self.uncommitted.len() as u64
    }

    /// Media types in insertion order
    pub fn media_types(&self) -> impl Iterator<Item = &MediaTypeNode<K>> {
        self.state.iter()
    }

    /// Check if `create` ran, or the branch was edited without it
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.meta.is_some() || self.version > 0
    }

    /// Events recorded since the last commit to storage
    #[inline]
    #[must_use]
    pub fn uncommitted_events(&self) -> &[TreeEvent<K>] {
        &self.uncommitted
    }

    /// Drain the uncommitted events for persistence
    pub fn take_uncommitted_events(&mut self) -> Vec<TreeEvent<K>> {
        std::mem::take(&mut self.uncommitted)
    }

    /// Forget uncommitted events once storage accepted them
    pub fn mark_committed(&mut self) {
        self.uncommitted.clear();
    }

    /// Create the branch, optionally starting from `base`'s head
    ///
    /// A branch created from a base shares the base's commits and starts
    /// from the base's graph. A base without commits contributes nothing.
    ///
    /// # Errors
    /// - `TreeError::AlreadyCreated` if the tree was created or edited
    /// - `TreeError::Graph` with `NameInvalid` for a blank name
    pub fn create(&mut self, name: &str, owner: UserId, base: Option<&Tree<K>>) -> Result<TreeEvent<K>, TreeError<K>> {
        if self.is_initialized() {
            return Err(TreeError::AlreadyCreated(self.id.clone()));
        }
        let name = Name::new(name).map_err(GraphError::<K>::from)?;

        let mut sources = ResolvedSources::new();
        let base = base.and_then(|tree| {
            let head = tree.head()?;
            let source = SourceCommitRef::new(tree.id.clone(), head.id());
            sources.insert(source.clone(), head.clone());
            Some(source)
        });

        self.record(TreeEvent::TreeCreated { name, owner, base }, &sources)
    }

    /// Add a media type
    ///
    /// # Errors
    /// - `GraphError::NameInvalid` for a blank name
    /// - `GraphError::AlreadyExists` if the id is taken
    pub fn add_media_type(&mut self, id: K, name: &str) -> Result<TreeEvent<K>, TreeError<K>> {
        let name = Name::new(name).map_err(GraphError::<K>::from)?;

        let mut attempt = self.state.clone();
        attempt.insert(id.clone(), name.clone())?;

        self.record(
            TreeEvent::MediaTypeAdded {
                id,
                name,
                commit_id: CommitId::new(),
            },
            &NoSources,
        )
    }

    /// Remove a media type, re-parenting its children under its parents
    ///
    /// # Errors
    /// Returns `GraphError::NotFound` if the id is unknown
    pub fn remove_media_type(&mut self, id: &K) -> Result<TreeEvent<K>, TreeError<K>> {
        let mut attempt = self.state.clone();
        attempt.remove_media_type(id)?;

        self.record(
            TreeEvent::MediaTypeRemoved {
                id: id.clone(),
                commit_id: CommitId::new(),
            },
            &NoSources,
        )
    }

    /// Make `parent_id` a parent of `child_id`
    ///
    /// # Errors
    /// - `GraphError::NotFound` for the parent, then for the child
    /// - `GraphError::WillCreateCycle` if the edge would close a loop
    pub fn add_parent_to_media_type(&mut self, child_id: &K, parent_id: &K) -> Result<TreeEvent<K>, TreeError<K>> {
        let mut attempt = self.state.clone();
        attempt.add_child_to_media_type(parent_id, child_id)?;

        self.record(
            TreeEvent::ParentAddedToMediaType {
                child_id: child_id.clone(),
                parent_id: parent_id.clone(),
                commit_id: CommitId::new(),
            },
            &NoSources,
        )
    }

    /// Merge `source` into this branch
    ///
    /// The base is the graph at the last commit both branches share, or an
    /// empty graph when they share none. Returns `None` without recording
    /// anything when the source has no commits or nothing new to offer.
    ///
    /// # Errors
    /// - `GraphError::AlreadyExists` for ids added on both sides
    /// - `GraphError::WillCreateCycle` if a source edge closes a loop here
    pub fn merge(&mut self, source: &Tree<K>) -> Result<Option<TreeEvent<K>>, TreeError<K>> {
        let Some(source_head) = source.head().cloned() else {
            tracing::debug!("merge {} into {}: source has no commits", source.id, self.id);
            return Ok(None);
        };

        let base = match self.history.last_common_commit(&source.history) {
            Some(common) => Self::replay_lineage(&common)?,
            None => GraphState::new(),
        };

        let mut attempt = self.state.clone();
        let changes = attempt.merge(&source.state, &base)?;
        if changes.is_empty() {
            tracing::debug!("merge {} into {}: nothing to merge", source.id, self.id);
            return Ok(None);
        }

        let source_ref = SourceCommitRef::new(source.id.clone(), source_head.id());
        let sources = ResolvedSources::single(source_ref.clone(), source_head);
        let event = TreeEvent::TreesMerged {
            changes,
            source: source_ref,
            commit_id: CommitId::new(),
        };
        self.record(event, &sources).map(Some)
    }

    /// Graph as it was right after `commit_id`
    ///
    /// # Errors
    /// Returns `HistoryError::UnknownCommit` if the commit is not in this
    /// branch's history
    pub fn state_at(&self, commit_id: CommitId) -> Result<GraphState<K>, TreeError<K>> {
        let commit = self
            .history
            .find(commit_id)
            .ok_or(HistoryError::UnknownCommit(commit_id))?;
        Self::replay_lineage(&commit)
    }

    /// Snapshot of this branch as it was right after `commit_id`
    ///
    /// Works for any commit in the history, including commits inherited
    /// from the base and source commits brought in by merges. The snapshot
    /// has `commit_id` as head, no uncommitted events, and a version equal
    /// to the length of the branch line leading to the commit.
    ///
    /// # Errors
    /// - `HistoryError::UnknownCommit` if the commit is not in this
    ///   branch's history
    /// - `TreeError::Internal` if the branch line does not replay
    pub fn at_commit(&self, commit_id: CommitId) -> Result<Self, TreeError<K>> {
        let commit = self
            .history
            .find(commit_id)
            .ok_or(HistoryError::UnknownCommit(commit_id))?;
        let state = Self::replay_lineage(&commit)?;
        let version = CommitHistory::lineage_of(&commit).len() as u64;

        Ok(Self {
            id: self.id.clone(),
            meta: self.meta.clone(),
            state,
            history: CommitHistory::from_head(Some(commit)),
            uncommitted: Vec::new(),
            version,
        })
    }

    /// Apply a freshly validated event and buffer it for persistence
    fn record(&mut self, event: TreeEvent<K>, sources: &impl CommitSource<K>) -> Result<TreeEvent<K>, TreeError<K>> {
        self.apply(event.clone(), sources).map_err(|err| {
            tracing::error!("validated {} event failed to apply on {}: {}", event.kind(), self.id, err);
            TreeError::Internal(format!("validated {} event failed to apply: {err}", event.kind()))
        })?;

        tracing::debug!("branch {} recorded {} at version {}", self.id, event.kind(), self.version);
        self.uncommitted.push(event.clone());
        Ok(event)
    }

    fn apply(&mut self, event: TreeEvent<K>, sources: &impl CommitSource<K>) -> Result<(), TreeError<K>> {
        if let TreeEvent::TreeCreated { name, owner, base } = event {
            return self.apply_created(name, owner, base, sources);
        }

        let commit_id = event
            .commit_id()
            .ok_or_else(|| TreeError::Internal(format!("{} event carries no commit", event.kind())))?;
        let source = match event.source_ref() {
            Some(source) => Some(
                sources
                    .resolve(source)
                    .ok_or_else(|| TreeError::UnresolvedSource(source.clone()))?,
            ),
            None => None,
        };

        if event.is_merge() {
            // Several changes: stage them so a failure leaves the graph untouched
            let mut next = self.state.clone();
            event.apply_to(&mut next)?;
            self.state = next;
        } else {
            event.apply_to(&mut self.state)?;
        }

        match source {
            Some(source) => self.history.add_merge_commit(commit_id, event, source),
            None => self.history.add_commit(commit_id, event),
        };
        self.version += 1;
        Ok(())
    }

    fn apply_created(
        &mut self,
        name: Name,
        owner: UserId,
        base: Option<SourceCommitRef>,
        sources: &impl CommitSource<K>,
    ) -> Result<(), TreeError<K>> {
        if self.is_initialized() {
            return Err(TreeError::AlreadyCreated(self.id.clone()));
        }

        if let Some(base) = &base {
            let head = sources
                .resolve(base)
                .ok_or_else(|| TreeError::UnresolvedSource(base.clone()))?;
            self.state = Self::replay_lineage(&head)?;
            self.history = CommitHistory::from_head(Some(head));
        }

        self.meta = Some(TreeMeta { name, owner, base });
        self.version += 1;
        Ok(())
    }

    /// Rebuild the graph at `commit` from the branch line leading to it
    fn replay_lineage(commit: &TreeCommit<K>) -> Result<GraphState<K>, TreeError<K>> {
        let mut state = GraphState::new();
        for step in CommitHistory::lineage_of(commit) {
            step.event().apply_to(&mut state).map_err(|err| {
                tracing::error!("commit {} does not replay: {}", step.id(), err);
                TreeError::Internal(format!("commit {} does not replay: {err}", step.id()))
            })?;
        }
        Ok(state)
    }
}

impl<K: NodeKey> CommitSource<K> for Tree<K> {
    fn resolve(&self, source: &SourceCommitRef) -> Option<TreeCommit<K>> {
        if source.branch_id != self.id {
            return None;
        }
        self.history.find(source.commit_id)
    }
}
