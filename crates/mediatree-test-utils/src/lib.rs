//! Testing utilities for the mediatree workspace
//!
//! Shared fixtures, builders and tracing setup.

#![allow(missing_docs)]

use mediatree_core::{MediaTreeConfig, MediaTypeService};
use mediatree_graph::{GraphState, MediaTypeId, MediaTypeNode};
use mediatree_history::BranchId;
use mediatree_store::InMemoryRepository;
use mediatree_tree::{Tree, UserId};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub type TestService = MediaTypeService<InMemoryRepository<MediaTypeId>, MediaTypeId>;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process
///
/// Honors `RUST_LOG`, defaulting to `debug` for workspace crates.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mediatree=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
        tracing::debug!("test tracing initialized");
    });
}

pub fn mt(raw: &str) -> MediaTypeId {
    MediaTypeId::from(raw)
}

pub fn branch(raw: &str) -> BranchId {
    BranchId::from(raw)
}

pub fn owner() -> UserId {
    UserId::from("tester")
}

/// Graph with one node per id (named after the id) and the given
/// `(parent, child)` edges
pub fn graph_of(ids: &[&str], edges: &[(&str, &str)]) -> GraphState<MediaTypeId> {
    let mut graph = GraphState::new();
    for id in ids {
        graph.add_media_type(mt(id), id).unwrap();
    }
    for (parent, child) in edges {
        graph.add_child_to_media_type(&mt(parent), &mt(child)).unwrap();
    }
    graph
}

/// Tree built through commands, one commit per node and edge
pub fn tree_of(name: &str, ids: &[&str], edges: &[(&str, &str)]) -> Tree<MediaTypeId> {
    let mut tree = Tree::new(branch(name));
    for id in ids {
        tree.add_media_type(mt(id), id).unwrap();
    }
    for (parent, child) in edges {
        tree.add_parent_to_media_type(&mt(child), &mt(parent)).unwrap();
    }
    tree
}

pub fn in_memory_service() -> TestService {
    init_tracing();
    MediaTypeService::in_memory(MediaTreeConfig::default())
}

pub fn service_with(config: MediaTreeConfig) -> TestService {
    init_tracing();
    MediaTypeService::in_memory(config)
}

/// `(id, children)` pairs in query order
pub fn listing(nodes: &[MediaTypeNode<MediaTypeId>]) -> Vec<(String, Vec<String>)> {
    nodes
        .iter()
        .map(|node| {
            let children = node.children().iter().map(ToString::to_string).collect();
            (node.id().to_string(), children)
        })
        .collect()
}
