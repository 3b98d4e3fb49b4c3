//! Alias Core Library
//!
//! Tracks which resources of a workspace tree resolve to the same, or to
//! overlapping, physical locations:
//! - Structured, totally ordered file-system locations
//! - An ordered index of project roots and linked resources
//! - Alias queries that map a location back to every tree position reaching it
//! - Incremental index maintenance driven by change events
//!
//! # Quick Start
//!
//! ```
//! use alias_core::{Config, Location, ResourceKind, ResourcePath, Workspace};
//!
//! let mut ws = Workspace::empty(Config::default()).unwrap();
//! ws.create_project("P", None).unwrap();
//!
//! let shared: Location = "file:/data/shared".parse().unwrap();
//! let f1: ResourcePath = "/P/F1".parse().unwrap();
//! let f2: ResourcePath = "/P/F2".parse().unwrap();
//! ws.create_link(&f1, ResourceKind::Folder, shared.clone()).unwrap();
//! ws.create_link(&f2, ResourceKind::Folder, shared).unwrap();
//!
//! let child = f1.append("child");
//! ws.create_file(&child).unwrap();
//!
//! let aliases = ws.aliases_of(&child).unwrap();
//! assert!(aliases.contains(&f2.append("child")));
//! ```
//!
//! # Features
//!
//! ## Location Order
//!
//! Locations compare field by field (scheme, authority, device, path,
//! query, fragment). Every descendant of a location sorts between the
//! location and its upper bound:
//!
//! ```
//! use alias_core::Location;
//! use std::cmp::Ordering;
//!
//! let dir: Location = "file:/data/dir".parse().unwrap();
//! let child: Location = "file:/data/dir/x".parse().unwrap();
//! let sibling: Location = "file:/data/dir0".parse().unwrap();
//!
//! assert!(dir < child);
//! assert_eq!(child.cmp_upper_bound(&dir), Ordering::Less);
//! assert_eq!(sibling.cmp_upper_bound(&dir), Ordering::Greater);
//! ```
//!
//! ## Incremental Updates
//!
//! Any [`ResourceTree`] can drive the index. Apply each change event after
//! the tree has changed; the result always equals a full rebuild:
//!
//! ```
//! use alias_core::{apply, rebuild, ChangeEvent, MemoryTree, ResourceKind};
//!
//! let mut tree = MemoryTree::new("file:/ws".parse().unwrap());
//! tree.create_project("P", None).unwrap();
//! let (mut index, _) = rebuild(&tree);
//!
//! let link = "/P/ext".parse().unwrap();
//! let target = "file:/data/ext".parse().unwrap();
//! tree.create_link(&link, ResourceKind::Folder, target).unwrap();
//! apply(&mut index, &ChangeEvent::Created { path: link }, &tree);
//!
//! assert_eq!(index, rebuild(&tree).0);
//! ```

mod builder;
mod config;
mod error;
mod events;
mod index;
mod location;
mod manager;
mod memory_tree;
mod query;
mod resource_path;
mod tree;
mod updater;
mod workspace;

pub use builder::{index_project, index_subtree, rebuild, RebuildReport};
pub use config::{Config, IndexConfig, QueryConfig, WorkspaceConfig, CONFIG_FILE};
pub use error::{AliasError, Result};
pub use events::ChangeEvent;
pub use index::{Claim, ClaimKind, LocationIndex};
pub use location::{Location, FILE_SCHEME};
pub use manager::{AliasManager, VerifyReport};
pub use memory_tree::{MemoryTree, ProjectManifest, ResourceManifest, WorkspaceManifest};
pub use query::compute_aliases;
pub use resource_path::ResourcePath;
pub use tree::{ProjectEntry, ResourceKind, ResourceNode, ResourceTree};
pub use updater::{apply, IndexEdits};
pub use workspace::{Operation, Script, Workspace};
