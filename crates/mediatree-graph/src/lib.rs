//! Mediatree Graph
//!
//! Acyclic media type hierarchy with cycle-safe edits and structural merge.
//!
//! # Core Concepts
//!
//! - [`NodeKey`]: Bound satisfied by any comparable, serializable identifier
//! - [`MediaTypeId`]: String identifier used by the default service
//! - [`Name`]: Validated, normalized human-readable name
//! - [`MediaTypeNode`]: A media type and its child edges
//! - [`GraphState`]: The node arena; enforces unique ids and acyclicity
//! - [`Change`]: One structural difference produced by [`GraphState::merge`]
//!
//! # Example
//!
//! ```rust,ignore
//! use mediatree_graph::{GraphState, MediaTypeId};
//!
//! let mut graph = GraphState::new();
//! graph.add_media_type(MediaTypeId::from("audio"), "Audio")?;
//! graph.add_media_type(MediaTypeId::from("flac"), "FLAC")?;
//! graph.add_child_to_media_type(&"audio".into(), &"flac".into())?;
//!
//! // flac -> audio would close a loop
//! assert!(graph.add_child_to_media_type(&"flac".into(), &"audio".into()).is_err());
//! ```

#![warn(unreachable_pub)]

mod error;
mod key;
mod merge;
mod name;
mod node;
mod state;

pub use error::{GraphError, GraphResult};
pub use key::{MediaTypeId, NodeKey};
pub use merge::Change;
pub use name::{Name, NameError};
pub use node::MediaTypeNode;
pub use state::GraphState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
