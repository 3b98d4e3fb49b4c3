//! Workspace controller: a resource tree with its alias manager.
//!
//! Every mutation goes through [`Workspace`], which changes the tree and then
//! feeds the resulting [`ChangeEvent`] to the manager. Both happen under the
//! same `&mut self` borrow, so no query can observe a tree and an index that
//! disagree.

use crate::builder::RebuildReport;
use crate::config::Config;
use crate::error::{AliasError, Result};
use crate::events::ChangeEvent;
use crate::location::Location;
use crate::manager::{AliasManager, VerifyReport};
use crate::memory_tree::{MemoryTree, WorkspaceManifest};
use crate::resource_path::ResourcePath;
use crate::tree::{ResourceKind, ResourceTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// A resource tree and the alias manager tracking it.
#[derive(Debug, Clone)]
pub struct Workspace {
    tree: MemoryTree,
    aliases: AliasManager,
}

impl Workspace {
    /// Wraps `tree` and builds its alias index.
    pub fn new(tree: MemoryTree, config: Config) -> Self {
        let mut aliases = AliasManager::new(config);
        aliases.startup(&tree);
        Self { tree, aliases }
    }

    /// Creates an empty workspace rooted at `config.workspace.default_root`.
    pub fn empty(config: Config) -> Result<Self> {
        let root = config.workspace.root_location()?;
        Ok(Self::new(MemoryTree::new(root), config))
    }

    /// Builds a workspace from a manifest.
    pub fn from_manifest(manifest: &WorkspaceManifest, config: Config) -> Result<Self> {
        let root = config.workspace.root_location()?;
        let tree = MemoryTree::from_manifest(manifest, &root)?;
        Ok(Self::new(tree, config))
    }

    /// The resource tree.
    pub fn tree(&self) -> &MemoryTree {
        &self.tree
    }

    /// The alias manager.
    pub fn aliases(&self) -> &AliasManager {
        &self.aliases
    }

    fn notify(&mut self, event: ChangeEvent) {
        self.aliases.handle(&event, &self.tree);
    }

    /// Aliases of the resource at `path`.
    ///
    /// Returns `None` if the resource does not exist, its project is closed,
    /// or nothing overlaps it.
    pub fn aliases_of(&self, path: &ResourcePath) -> Option<BTreeSet<ResourcePath>> {
        if !self.tree.exists(path) || !self.tree.is_open(path.project_name()?) {
            return None;
        }
        let location = self.tree.location(path)?;
        self.aliases.compute_aliases(path, &location)
    }

    /// Resolved location of the resource at `path`.
    pub fn location_of(&self, path: &ResourcePath) -> Option<Location> {
        if self.tree.exists(path) {
            self.tree.location(path)
        } else {
            None
        }
    }

    /// Discards the index and rebuilds it from the tree.
    pub fn restart(&mut self) -> RebuildReport {
        self.aliases.shutdown();
        self.aliases.startup(&self.tree)
    }

    /// Compares the live index with a rebuild.
    pub fn verify(&self) -> Result<VerifyReport> {
        self.aliases.verify(&self.tree)
    }

    /// Creates an open project.
    pub fn create_project(&mut self, name: &str, location: Option<Location>) -> Result<()> {
        self.tree.create_project(name, location)?;
        self.notify(ChangeEvent::ProjectCreated {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Opens a project.
    pub fn open_project(&mut self, name: &str) -> Result<()> {
        self.tree.open_project(name)?;
        self.notify(ChangeEvent::ProjectOpened {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Closes a project.
    pub fn close_project(&mut self, name: &str) -> Result<()> {
        self.tree.close_project(name)?;
        self.notify(ChangeEvent::ProjectClosed {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Deletes a project.
    pub fn delete_project(&mut self, name: &str) -> Result<()> {
        self.tree.delete_project(name)?;
        self.notify(ChangeEvent::ProjectDeleted {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Moves a project to `location`, or back to its default location.
    pub fn relocate_project(&mut self, name: &str, location: Option<Location>) -> Result<()> {
        self.tree.relocate_project(name, location)?;
        self.notify(ChangeEvent::ProjectRelocated {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Creates a plain folder.
    pub fn create_folder(&mut self, path: &ResourcePath) -> Result<()> {
        self.tree.create_folder(path)?;
        self.notify(ChangeEvent::Created { path: path.clone() });
        Ok(())
    }

    /// Creates a plain file.
    pub fn create_file(&mut self, path: &ResourcePath) -> Result<()> {
        self.tree.create_file(path)?;
        self.notify(ChangeEvent::Created { path: path.clone() });
        Ok(())
    }

    /// Creates a linked folder or file.
    pub fn create_link(
        &mut self,
        path: &ResourcePath,
        kind: ResourceKind,
        target: Location,
    ) -> Result<()> {
        self.tree.create_link(path, kind, target.clone())?;
        self.notify(ChangeEvent::LinkAdded {
            path: path.clone(),
            location: target,
        });
        Ok(())
    }

    /// Deletes a resource and its subtree. Deleting a project path deletes
    /// the project.
    pub fn delete(&mut self, path: &ResourcePath) -> Result<()> {
        if path.is_project() {
            let name = path.project_name().unwrap_or_default().to_string();
            return self.delete_project(&name);
        }
        let linked = self.tree.node(path).is_some_and(|node| node.is_linked());
        self.tree.delete(path)?;
        let event = if linked {
            ChangeEvent::LinkRemoved { path: path.clone() }
        } else {
            ChangeEvent::Deleted { path: path.clone() }
        };
        self.notify(event);
        Ok(())
    }

    /// Records a content change.
    pub fn touch(&mut self, path: &ResourcePath) -> Result<()> {
        self.tree.touch(path)?;
        self.notify(ChangeEvent::ContentChanged { path: path.clone() });
        Ok(())
    }

    /// Moves a resource and its subtree.
    ///
    /// # Errors
    ///
    /// Besides the tree's own preconditions, fails with
    /// `AliasError::InvalidOperation` when the destination's location lies
    /// inside the source's location.
    pub fn move_resource(&mut self, from: &ResourcePath, to: &ResourcePath) -> Result<()> {
        self.check_destination("move", from, to)?;
        self.tree.move_resource(from, to)?;
        self.notify(ChangeEvent::Moved {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    /// Copies a resource and its subtree.
    ///
    /// # Errors
    ///
    /// Same as [`move_resource`](Self::move_resource).
    pub fn copy_resource(&mut self, from: &ResourcePath, to: &ResourcePath) -> Result<()> {
        self.check_destination("copy", from, to)?;
        self.tree.copy_resource(from, to)?;
        self.notify(ChangeEvent::Copied {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    /// Rejects a transfer whose destination would be written inside its own
    /// source, e.g. a folder copied into a link that targets the folder.
    ///
    /// Linked sources are checked too. A link keeps its target when it moves,
    /// so placing it under a folder that resolves inside that target would
    /// make the link an entry of the directory it points at, and the tree
    /// would then contain itself.
    fn check_destination(
        &self,
        operation: &str,
        from: &ResourcePath,
        to: &ResourcePath,
    ) -> Result<()> {
        if from.is_project() {
            return Ok(());
        }
        let source = self
            .location_of(from)
            .ok_or_else(|| AliasError::ResourceNotFound(from.to_string()))?;
        let destination = to
            .parent()
            .and_then(|parent| self.location_of(&parent))
            .zip(to.name())
            .map(|(parent, name)| parent.append(name));
        match destination {
            Some(destination) if source.is_prefix_of(&destination) => {
                Err(AliasError::invalid_operation(
                    operation,
                    from,
                    format!("destination {} ({}) is inside the source", to, destination),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Applies one scripted operation.
    pub fn apply(&mut self, operation: &Operation) -> Result<()> {
        match operation {
            Operation::CreateProject { name, location } => {
                self.create_project(name, location.clone())
            }
            Operation::OpenProject { name } => self.open_project(name),
            Operation::CloseProject { name } => self.close_project(name),
            Operation::DeleteProject { name } => self.delete_project(name),
            Operation::RelocateProject { name, location } => {
                self.relocate_project(name, location.clone())
            }
            Operation::CreateFolder { path } => self.create_folder(path),
            Operation::CreateFile { path } => self.create_file(path),
            Operation::Link { path, kind, target } => {
                self.create_link(path, *kind, target.clone())
            }
            Operation::Delete { path } => self.delete(path),
            Operation::Touch { path } => self.touch(path),
            Operation::Move { from, to } => self.move_resource(from, to),
            Operation::Copy { from, to } => self.copy_resource(from, to),
            Operation::Restart => {
                self.restart();
                Ok(())
            }
        }
    }
}

/// One step of a mutation script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Create an open project.
    CreateProject {
        name: String,
        #[serde(default)]
        location: Option<Location>,
    },
    /// Open a project.
    OpenProject { name: String },
    /// Close a project.
    CloseProject { name: String },
    /// Delete a project.
    DeleteProject { name: String },
    /// Change a project's location.
    RelocateProject {
        name: String,
        #[serde(default)]
        location: Option<Location>,
    },
    /// Create a plain folder.
    CreateFolder { path: ResourcePath },
    /// Create a plain file.
    CreateFile { path: ResourcePath },
    /// Create a linked resource.
    Link {
        path: ResourcePath,
        #[serde(default = "default_link_kind")]
        kind: ResourceKind,
        target: Location,
    },
    /// Delete a resource.
    Delete { path: ResourcePath },
    /// Change file content.
    Touch { path: ResourcePath },
    /// Move a resource.
    Move { from: ResourcePath, to: ResourcePath },
    /// Copy a resource.
    Copy { from: ResourcePath, to: ResourcePath },
    /// Rebuild the alias index from scratch.
    Restart,
}

fn default_link_kind() -> ResourceKind {
    ResourceKind::Folder
}

/// A TOML list of operations.
///
/// ```toml
/// [[step]]
/// op = "link"
/// path = "/P/F1"
/// target = "file:/data/D"
///
/// [[step]]
/// op = "create_file"
/// path = "/P/F1/child"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Steps in order.
    #[serde(default, rename = "step")]
    pub steps: Vec<Operation>,
}

impl Script {
    /// Parses a script from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AliasError::ManifestError(format!("failed to parse script: {}", e)))
    }

    /// Loads a script from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AliasError::ManifestError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }
}
