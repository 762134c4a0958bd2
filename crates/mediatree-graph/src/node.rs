//! Media type nodes

use crate::key::NodeKey;
use crate::name::Name;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A media type and its outgoing child edges
///
/// Nodes carry no parent pointers; parents are derived by scanning the
/// graph for nodes that list this id as a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct MediaTypeNode<K: NodeKey> {
    id: K,
    name: Name,
    children: IndexSet<K>,
}

impl<K: NodeKey> MediaTypeNode<K> {
    /// Create node without children
    #[inline]
    #[must_use]
    pub fn new(id: K, name: Name) -> Self {
        Self {
            id,
            name,
            children: IndexSet::new(),
        }
    }

    /// Identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &K {
        &self.id
    }

    /// Name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Child ids in insertion order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &IndexSet<K> {
        &self.children
    }

    /// Check for a direct child edge
    #[inline]
    #[must_use]
    pub fn has_child(&self, id: &K) -> bool {
        self.children.contains(id)
    }

    #[inline]
    pub(crate) fn insert_child(&mut self, id: K) -> bool {
        self.children.insert(id)
    }

    #[inline]
    pub(crate) fn remove_child(&mut self, id: &K) -> bool {
        self.children.shift_remove(id)
    }
}
