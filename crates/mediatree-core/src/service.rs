//! Media type command service
//!
//! Every command loads the branch from the repository, runs against the
//! aggregate and appends the resulting events with the version it loaded.

use crate::command::{AddMediaType, AddParentToMediaType, CreateBranch, MergeBranches, RemoveMediaType};
use crate::config::MediaTreeConfig;
use crate::error::ServiceError;
use mediatree_graph::{MediaTypeNode, NodeKey};
use mediatree_history::{BranchId, CommitId};
use mediatree_store::{InMemoryBranchLog, InMemoryRepository, TreeRepository};
use mediatree_tree::{Tree, TreeEvent, UserId};
use std::marker::PhantomData;

/// Command and query entry point
#[derive(Debug)]
pub struct MediaTypeService<R, K> {
    repository: R,
    config: MediaTreeConfig,
    _key: PhantomData<fn() -> K>,
}

impl<K: NodeKey> MediaTypeService<InMemoryRepository<K>, K> {
    /// Service backed by in-memory branch logs
    #[must_use]
    pub fn in_memory(config: MediaTreeConfig) -> Self {
        let repository = InMemoryRepository::new(InMemoryBranchLog::new(), config.store.clone());
        Self::new(repository, config)
    }
}

impl<R, K> MediaTypeService<R, K>
where
    R: TreeRepository<K>,
    K: NodeKey,
{
    /// Create service over `repository`
    #[inline]
    #[must_use]
    pub fn new(repository: R, config: MediaTreeConfig) -> Self {
        Self {
            repository,
            config,
            _key: PhantomData,
        }
    }

    /// Underlying repository
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MediaTreeConfig {
        &self.config
    }

    /// Create the configured main branch unless it exists
    ///
    /// Returns `true` if the branch was created.
    ///
    /// # Errors
    /// Propagates repository failures
    pub async fn init(&self, owner: UserId) -> Result<bool, ServiceError<K>> {
        let main = self.config.main_branch.clone();
        if self.repository.exists(&main).await? {
            return Ok(false);
        }
        let name = main.to_string();
        self.create_branch(CreateBranch::new(main, name, owner)).await?;
        Ok(true)
    }

    /// Create a branch
    ///
    /// # Errors
    /// - `BranchAlreadyExists` if the id is taken
    /// - `NotFound` for an unknown base branch
    /// - `NameInvalid` for a blank name
    pub async fn create_branch(&self, command: CreateBranch) -> Result<(), ServiceError<K>> {
        tracing::info!("creating branch {}", command.id);

        if self.repository.exists(&command.id).await? {
            return Err(ServiceError::BranchAlreadyExists(command.id));
        }
        let base = match &command.base {
            Some(base) => Some(self.repository.get(base).await?),
            None => None,
        };

        let mut tree = Tree::new(command.id);
        tree.create(&command.name, command.owner, base.as_ref())?;
        self.commit(&mut tree).await
    }

    /// Add a media type, returning its id
    ///
    /// # Errors
    /// - `NotFound` for an unknown branch
    /// - `AlreadyExists` if the id is taken
    /// - `NameInvalid` for a blank name
    pub async fn add_media_type(&self, command: AddMediaType<K>) -> Result<K, ServiceError<K>> {
        tracing::info!("adding media type {} to {}", command.id, command.branch);

        let mut tree = self.repository.get(&command.branch).await?;
        tree.add_media_type(command.id.clone(), &command.name)?;
        self.commit(&mut tree).await?;
        Ok(command.id)
    }

    /// Make `parent_id` a parent of `child_id`
    ///
    /// # Errors
    /// - `NotFound` for an unknown branch, parent or child
    /// - `WillCreateCycle` if the edge would close a loop
    pub async fn add_parent_to_media_type(&self, command: AddParentToMediaType<K>) -> Result<(), ServiceError<K>> {
        tracing::info!(
            "adding parent {} to media type {} on {}",
            command.parent_id,
            command.child_id,
            command.branch
        );

        let mut tree = self.repository.get(&command.branch).await?;
        tree.add_parent_to_media_type(&command.child_id, &command.parent_id)?;
        self.commit(&mut tree).await
    }

    /// Remove a media type
    ///
    /// # Errors
    /// `NotFound` for an unknown branch or media type
    pub async fn remove_media_type(&self, command: RemoveMediaType<K>) -> Result<(), ServiceError<K>> {
        tracing::info!("removing media type {} from {}", command.id, command.branch);

        let mut tree = self.repository.get(&command.branch).await?;
        tree.remove_media_type(&command.id)?;
        self.commit(&mut tree).await
    }

    /// Merge one branch into another
    ///
    /// Returns the merge event, or `None` when there was nothing to merge.
    ///
    /// # Errors
    /// - `NotFound` for an unknown source or target branch
    /// - `AlreadyExists` for ids added independently on both branches
    /// - `WillCreateCycle` if a source edge closes a loop in the target
    pub async fn merge_branches(&self, command: MergeBranches) -> Result<Option<TreeEvent<K>>, ServiceError<K>> {
        tracing::info!("merging {} into {}", command.source, command.target);

        let source = self.repository.get(&command.source).await?;
        let mut target = self.repository.get(&command.target).await?;

        let event = target.merge(&source)?;
        match &event {
            Some(TreeEvent::TreesMerged { changes, .. }) => {
                self.commit(&mut target).await?;
                tracing::info!("merged {} changes into {}", changes.len(), command.target);
            }
            _ => tracing::info!("nothing to merge from {} into {}", command.source, command.target),
        }
        Ok(event)
    }

    /// Media types of a branch in insertion order
    ///
    /// # Errors
    /// `NotFound` for an unknown branch
    pub async fn media_types(&self, branch: &BranchId) -> Result<Vec<MediaTypeNode<K>>, ServiceError<K>> {
        let tree = self.repository.get(branch).await?;
        Ok(tree.media_types().cloned().collect())
    }

    /// Media types of a branch as they were at `commit`
    ///
    /// # Errors
    /// `NotFound` for an unknown branch or a commit not on it
    pub async fn media_types_at(
        &self,
        branch: &BranchId,
        commit: CommitId,
    ) -> Result<Vec<MediaTypeNode<K>>, ServiceError<K>> {
        let tree = self.repository.get_to_commit(branch, commit).await?;
        Ok(tree.media_types().cloned().collect())
    }

    async fn commit(&self, tree: &mut Tree<K>) -> Result<(), ServiceError<K>> {
        match self.repository.commit(tree).await {
            Ok(version) => {
                tracing::debug!("branch {} now at version {}", tree.id(), version);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("saving branch {} failed: {}", tree.id(), err);
                Err(err.into())
            }
        }
    }
}
