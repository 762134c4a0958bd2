//! Mediatree Store
//!
//! Repository port and event-sourced storage for branch aggregates.
//!
//! # Core Concepts
//!
//! - [`TreeRepository`]: Load a branch (optionally up to a commit), append events
//! - [`BranchLog`]: Per-branch append-only log with version-checked append
//! - [`EventStore`]: Single stream for a tree that never branches
//! - [`EventSourcedRepository`]: Replays branch logs, resolving cross-branch commits
//! - [`StoreConfig`]: Concurrency strategy for appends
//!
//! # Concurrency
//!
//! Every branch has a version equal to the number of events in its log.
//! Writers pass the version they loaded; an append against a newer log
//! fails with [`StoreError::VersionConflict`] unless checks are disabled
//! through [`ConcurrencyControl::Unchecked`].

#![warn(unreachable_pub)]

mod config;
mod error;
mod memory;
mod port;
mod repository;

pub use config::{ConcurrencyControl, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryBranchLog, InMemoryEventStore};
pub use port::{BranchLog, EventStore, TreeRepository};
pub use repository::{EventSourcedRepository, SingleStreamRepository};

/// Repository over in-memory branch logs
pub type InMemoryRepository<K> = EventSourcedRepository<InMemoryBranchLog<K>, K>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
