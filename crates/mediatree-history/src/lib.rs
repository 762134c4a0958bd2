//! Mediatree History
//!
//! Append-only commit DAG for branchable, event-sourced state.
//!
//! # Core Concepts
//!
//! - [`CommitId`]: UUID identifying one commit
//! - [`BranchId`]: Name of an independently evolving lineage
//! - [`SourceCommitRef`]: A commit addressed through the branch that owns it
//! - [`Commit`]: Immutable record of one payload and its parent commits
//! - [`CommitHistory`]: A branch head with ancestor queries
//!
//! Commits are reference counted and shared between histories, so a merge
//! commit on one branch links directly to the tip of another.

#![warn(unreachable_pub)]

mod commit;
mod history;
mod id;

pub use commit::{Ancestors, Commit};
pub use history::{CommitHistory, HistoryError};
pub use id::{BranchId, CommitId, SourceCommitRef};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
