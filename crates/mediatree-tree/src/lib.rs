//! Mediatree Tree
//!
//! Event-sourced aggregate for one branch of the media type hierarchy.
//!
//! # Core Concepts
//!
//! - [`Tree`]: Graph state, commit history and uncommitted events of a branch
//! - [`TreeEvent`]: Closed set of events; every edit produces one commit
//! - [`CommitSource`]: Resolves commits owned by other branches during replay
//! - [`TreeError`]: Graph and history errors plus replay failures
//!
//! # Example
//!
//! ```rust,ignore
//! use mediatree_tree::Tree;
//!
//! let mut main = Tree::new("main".into());
//! main.add_media_type("audio".into(), "Audio")?;
//!
//! let mut feature = Tree::new("feature".into());
//! feature.create("Feature", "bob".into(), Some(&main))?;
//! feature.add_media_type("flac".into(), "FLAC")?;
//! feature.add_parent_to_media_type(&"flac".into(), &"audio".into())?;
//!
//! let merged = main.merge(&feature)?;
//! assert!(merged.is_some());
//! ```

#![warn(unreachable_pub)]

mod aggregate;
mod error;
mod event;
mod meta;
mod source;

pub use aggregate::Tree;
pub use error::{TreeError, TreeResult};
pub use event::TreeEvent;
pub use meta::{TreeMeta, UserId};
pub use source::{CommitSource, NoSources, ResolvedSources, TreeCommit};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
