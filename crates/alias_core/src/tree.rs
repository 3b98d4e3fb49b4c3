//! Contract of the resource tree the alias subsystem observes.
//!
//! The workspace owns the tree; the alias subsystem only reads it. Any type
//! implementing [`ResourceTree`] can drive a rebuild or an incremental
//! update. [`MemoryTree`](crate::MemoryTree) is the in-memory implementation
//! used by the workspace controller, the CLI and the tests.

use crate::error::Result;
use crate::location::Location;
use crate::resource_path::ResourcePath;
use serde::{Deserialize, Serialize};

/// Kind of a node in the resource tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A project (first level of the tree).
    Project,
    /// A folder.
    Folder,
    /// A file.
    File,
}

/// A node of the resource tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    /// Node kind.
    pub kind: ResourceKind,
    /// Target of a linked resource. `None` for plain resources, whose
    /// location derives from their parent.
    pub link: Option<Location>,
}

impl ResourceNode {
    /// A plain (non-linked) node.
    pub fn plain(kind: ResourceKind) -> Self {
        Self { kind, link: None }
    }

    /// Returns true for linked resources.
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

/// A project as seen by the alias subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    /// Project name (first path segment).
    pub name: String,
    /// Whether the project is open.
    pub open: bool,
    /// Resolved project location.
    pub location: Location,
    /// True when the location was chosen by the user instead of defaulting
    /// to `<workspace root>/<name>`.
    pub explicit: bool,
}

impl ProjectEntry {
    /// Workspace path of the project.
    pub fn path(&self) -> ResourcePath {
        ResourcePath::project(&self.name)
    }
}

/// Read access to the workspace resource tree.
pub trait ResourceTree {
    /// All projects, open or closed.
    fn projects(&self) -> Vec<ProjectEntry>;

    /// The node at `path`, if it exists.
    fn node(&self, path: &ResourcePath) -> Option<ResourceNode>;

    /// Direct children of `path`.
    ///
    /// # Errors
    ///
    /// Implementations return `AliasError::TraversalFailed` when a node
    /// cannot be listed. Callers skip that node and carry on.
    fn children(&self, path: &ResourcePath) -> Result<Vec<ResourcePath>>;

    /// The project called `name`.
    fn project(&self, name: &str) -> Option<ProjectEntry> {
        self.projects().into_iter().find(|p| p.name == name)
    }

    /// Resolved location of `path`: the nearest link or project root at or
    /// above it, plus the remaining segments.
    fn location(&self, path: &ResourcePath) -> Option<Location> {
        let project = self.project(path.project_name()?)?;
        for ancestor in path.ancestors() {
            if ancestor.is_project() {
                break;
            }
            if let Some(target) = self.node(&ancestor).and_then(|n| n.link) {
                let rest = path.strip_prefix(&ancestor)?;
                return Some(target.join(rest));
            }
        }
        let rest = path.strip_prefix(&project.path())?;
        Some(project.location.join(rest))
    }
}
