//! Graph state: the media type arena
//!
//! Provides [`GraphState`], an id-indexed arena of [`MediaTypeNode`]s whose
//! child edges always form a DAG.

use crate::error::GraphError;
use crate::key::NodeKey;
use crate::name::Name;
use crate::node::MediaTypeNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Media type graph
///
/// # Invariants
/// - Ids are unique
/// - Every child id refers to a node present in the graph
/// - No node can reach itself through child edges
///
/// Nodes iterate in insertion order. Cloning performs a deep copy, which
/// is how callers validate an edit before committing to it.
///
/// Backed by an `IndexMap` arena rather than `petgraph` since children must
/// keep insertion order and cycle errors report the exact offending path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct GraphState<K: NodeKey> {
    nodes: IndexMap<K, MediaTypeNode<K>>,
}

impl<K: NodeKey> Default for GraphState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> GraphState<K> {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Number of media types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if graph has no media types
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if id is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node
    #[inline]
    #[must_use]
    pub fn get(&self, id: &K) -> Option<&MediaTypeNode<K>> {
        self.nodes.get(id)
    }

    /// Iterate nodes in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &MediaTypeNode<K>> {
        self.nodes.values()
    }

    /// Direct children of a node (empty if unknown)
    #[must_use]
    pub fn children_of(&self, id: &K) -> Vec<K> {
        self.nodes
            .get(id)
            .map(|node| node.children().iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Direct parents of a node, found by scanning every node
    #[must_use]
    pub fn parents_of(&self, id: &K) -> Vec<K> {
        self.nodes
            .values()
            .filter(|node| node.has_child(id))
            .map(|node| node.id().clone())
            .collect()
    }

    /// Nodes without any parent
    #[must_use]
    pub fn roots(&self) -> Vec<K> {
        let children: HashSet<&K> = self.nodes.values().flat_map(|n| n.children()).collect();
        self.nodes
            .keys()
            .filter(|id| !children.contains(id))
            .cloned()
            .collect()
    }

    /// Add a media type after validating its name
    ///
    /// # Errors
    /// - `GraphError::NameInvalid` if the name is blank after normalization
    /// - `GraphError::AlreadyExists` if the id is taken
    pub fn add_media_type(&mut self, id: K, name: &str) -> Result<(), GraphError<K>> {
        let name = Name::new(name)?;
        self.insert(id, name)
    }

    /// Add a media type with an already validated name
    ///
    /// # Errors
    /// Returns `GraphError::AlreadyExists` if the id is taken
    pub fn insert(&mut self, id: K, name: Name) -> Result<(), GraphError<K>> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::AlreadyExists(id));
        }
        self.nodes.insert(id.clone(), MediaTypeNode::new(id, name));
        Ok(())
    }

    /// Remove a media type, re-parenting its children
    ///
    /// Every child of the removed node becomes a child of every parent of
    /// the removed node. Children of a removed root lose that parent and
    /// gain none.
    ///
    /// # Errors
    /// - `GraphError::NotFound` if the id is unknown
    /// - `GraphError::Internal` if re-parenting hits a cycle, which is only
    ///   possible when the graph was already corrupt
    pub fn remove_media_type(&mut self, id: &K) -> Result<(), GraphError<K>> {
        let children = match self.nodes.get(id) {
            Some(node) => node.children().iter().cloned().collect::<Vec<_>>(),
            None => return Err(GraphError::NotFound(id.clone())),
        };
        let parents = self.parents_of(id);

        for parent in &parents {
            for child in &children {
                self.add_child_to_media_type(parent, child).map_err(|err| {
                    tracing::error!(
                        "re-parenting {} under {} failed while removing {}: {}",
                        child,
                        parent,
                        id,
                        err
                    );
                    GraphError::Internal(format!(
                        "re-parenting {child} under {parent} while removing {id}: {err}"
                    ))
                })?;
            }
        }

        for parent in &parents {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.remove_child(id);
            }
        }
        self.nodes.shift_remove(id);
        Ok(())
    }

    /// Add a child edge `parent_id -> child_id`
    ///
    /// Existence is checked for the parent first, then the child. Adding
    /// an edge that already exists succeeds without change.
    ///
    /// # Errors
    /// - `GraphError::NotFound` naming the first missing endpoint
    /// - `GraphError::WillCreateCycle` with the path from the child back to
    ///   the parent followed by the child id again
    pub fn add_child_to_media_type(&mut self, parent_id: &K, child_id: &K) -> Result<(), GraphError<K>> {
        if !self.nodes.contains_key(parent_id) {
            return Err(GraphError::NotFound(parent_id.clone()));
        }
        if !self.nodes.contains_key(child_id) {
            return Err(GraphError::NotFound(child_id.clone()));
        }

        if let Some(mut path) = self.find_path(child_id, parent_id) {
            path.push(child_id.clone());
            return Err(GraphError::WillCreateCycle(path));
        }

        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.insert_child(child_id.clone());
        }
        Ok(())
    }

    /// Find a path of child edges from `from` to `to`
    ///
    /// Returns the visited ids in order, both ends included. A node always
    /// reaches itself with the single-element path `[from]`.
    #[must_use]
    pub fn find_path(&self, from: &K, to: &K) -> Option<Vec<K>> {
        let start = self.nodes.get(from)?;
        if from == to {
            return Some(vec![from.clone()]);
        }

        // Explicit stack: deep hierarchies must not exhaust the call stack
        let mut visited: HashSet<&K> = HashSet::from([from]);
        let mut path: Vec<&K> = vec![from];
        let mut stack = vec![start.children().iter()];

        while let Some(frontier) = stack.last_mut() {
            match frontier.next() {
                Some(next) if next == to => {
                    path.push(next);
                    return Some(path.into_iter().cloned().collect());
                }
                Some(next) => {
                    if !visited.insert(next) {
                        continue;
                    }
                    if let Some(node) = self.nodes.get(next) {
                        path.push(next);
                        stack.push(node.children().iter());
                    }
                }
                None => {
                    stack.pop();
                    path.pop();
                }
            }
        }
        None
    }

    /// Check if `to` is reachable from `from`
    #[inline]
    #[must_use]
    pub fn has_path(&self, from: &K, to: &K) -> bool {
        self.find_path(from, to).is_some()
    }

    /// Check the acyclicity invariant across the whole graph
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.nodes.values().all(|node| {
            node.children()
                .iter()
                .all(|child| !self.has_path(child, node.id()))
        })
    }
}
