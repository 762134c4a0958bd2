//! Mediatree Core - versioned media type hierarchy service
//!
//! Entry point for callers that create branches, edit the hierarchy and
//! merge branches:
//! - Loads branch aggregates through a [`TreeRepository`](mediatree_store::TreeRepository)
//! - Runs commands and persists the resulting events
//! - Classifies failures into [`ErrorKind`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use mediatree_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = MediaTypeService::in_memory(MediaTreeConfig::new());
//! service.create_branch(CreateBranch::new("main", "Main", "alice")).await?;
//! service.add_media_type(AddMediaType::new("main", MediaTypeId::from("audio"), "Audio")).await?;
//!
//! service.create_branch(CreateBranch::new("feature", "Feature", "bob").from_base("main")).await?;
//! service.add_media_type(AddMediaType::new("feature", MediaTypeId::from("flac"), "FLAC")).await?;
//! service.merge_branches(MergeBranches::new("feature", "main")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod command;
pub mod config;
pub mod error;
pub mod service;

pub use command::{AddMediaType, AddParentToMediaType, CreateBranch, MergeBranches, RemoveMediaType};
pub use config::{ConfigError, MediaTreeConfig};
pub use error::{ErrorKind, ServiceError};
pub use service::MediaTypeService;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the media type service
    pub use crate::{
        AddMediaType, AddParentToMediaType, CreateBranch, ErrorKind, MediaTreeConfig, MediaTypeService,
        MergeBranches, RemoveMediaType, ServiceError,
    };
    pub use mediatree_graph::{MediaTypeId, MediaTypeNode};
    pub use mediatree_history::BranchId;
    pub use mediatree_tree::UserId;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
