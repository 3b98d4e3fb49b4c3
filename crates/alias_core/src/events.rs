//! Change notifications emitted after each committed tree mutation.

use crate::location::Location;
use crate::resource_path::ResourcePath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A committed change to the resource tree.
///
/// Events describe what happened, not how the index must change; see
/// [`apply`](crate::apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A folder or file was created.
    Created { path: ResourcePath },
    /// A resource and its subtree were deleted.
    Deleted { path: ResourcePath },
    /// File content changed.
    ContentChanged { path: ResourcePath },
    /// A resource and its subtree moved. Moving a project renames it.
    Moved { from: ResourcePath, to: ResourcePath },
    /// A resource and its subtree were copied.
    Copied { from: ResourcePath, to: ResourcePath },
    /// A linked resource was created.
    LinkAdded { path: ResourcePath, location: Location },
    /// A linked resource was deleted.
    LinkRemoved { path: ResourcePath },
    /// A project was created.
    ProjectCreated { name: String },
    /// A project was opened.
    ProjectOpened { name: String },
    /// A project was closed.
    ProjectClosed { name: String },
    /// A project was deleted.
    ProjectDeleted { name: String },
    /// A project's location changed.
    ProjectRelocated { name: String },
}

impl ChangeEvent {
    /// Short name of the event kind, as used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Deleted { .. } => "deleted",
            Self::ContentChanged { .. } => "content_changed",
            Self::Moved { .. } => "moved",
            Self::Copied { .. } => "copied",
            Self::LinkAdded { .. } => "link_added",
            Self::LinkRemoved { .. } => "link_removed",
            Self::ProjectCreated { .. } => "project_created",
            Self::ProjectOpened { .. } => "project_opened",
            Self::ProjectClosed { .. } => "project_closed",
            Self::ProjectDeleted { .. } => "project_deleted",
            Self::ProjectRelocated { .. } => "project_relocated",
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { path }
            | Self::Deleted { path }
            | Self::ContentChanged { path }
            | Self::LinkRemoved { path } => write!(f, "{} {}", self.kind(), path),
            Self::Moved { from, to } | Self::Copied { from, to } => {
                write!(f, "{} {} -> {}", self.kind(), from, to)
            }
            Self::LinkAdded { path, location } => {
                write!(f, "{} {} -> {}", self.kind(), path, location)
            }
            Self::ProjectCreated { name }
            | Self::ProjectOpened { name }
            | Self::ProjectClosed { name }
            | Self::ProjectDeleted { name }
            | Self::ProjectRelocated { name } => write!(f, "{} /{}", self.kind(), name),
        }
    }
}
