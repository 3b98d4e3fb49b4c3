//! In-memory resource tree and its TOML manifest.
//!
//! [`MemoryTree`] keeps projects, folders, files and links as plain metadata.
//! It performs no file-system access: a link target does not have to exist,
//! and nothing is mirrored between aliases. That is the job of the
//! surrounding workspace; the tree only validates structural preconditions.

use crate::error::{AliasError, Result};
use crate::location::Location;
use crate::resource_path::ResourcePath;
use crate::tree::{ProjectEntry, ResourceKind, ResourceNode, ResourceTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectState {
    open: bool,
    /// Explicit location; `None` means `<root>/<name>`.
    location: Option<Location>,
}

/// In-memory implementation of [`ResourceTree`].
#[derive(Debug, Clone)]
pub struct MemoryTree {
    root: Location,
    projects: BTreeMap<String, ProjectState>,
    /// Every resource including project roots, keyed by workspace path.
    nodes: BTreeMap<ResourcePath, ResourceNode>,
}

impl MemoryTree {
    /// Creates an empty tree whose projects default to `root/<name>`.
    pub fn new(root: Location) -> Self {
        Self {
            root,
            projects: BTreeMap::new(),
            nodes: BTreeMap::new(),
        }
    }

    /// Builds a tree from a manifest.
    ///
    /// Projects are created open, resources are added parents-first, and
    /// projects marked `open = false` are closed last.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest describes an impossible tree, e.g. a
    /// resource whose parent is missing.
    pub fn from_manifest(manifest: &WorkspaceManifest, default_root: &Location) -> Result<Self> {
        let root = manifest.root.clone().unwrap_or_else(|| default_root.clone());
        let mut tree = Self::new(root);

        for project in &manifest.projects {
            tree.create_project(&project.name, project.location.clone())?;
        }

        let mut resources: Vec<&ResourceManifest> = manifest.resources.iter().collect();
        resources.sort_by_key(|r| r.path.depth());
        for resource in resources {
            match &resource.link {
                Some(target) => tree.create_link(&resource.path, resource.kind, target.clone())?,
                None => match resource.kind {
                    ResourceKind::File => tree.create_file(&resource.path)?,
                    ResourceKind::Folder => tree.create_folder(&resource.path)?,
                    ResourceKind::Project => {
                        return Err(AliasError::ManifestError(format!(
                            "{} declares kind 'project'; use a [[project]] table",
                            resource.path
                        )))
                    }
                },
            }
        }

        for project in manifest.projects.iter().filter(|p| !p.open) {
            tree.close_project(&project.name)?;
        }

        Ok(tree)
    }

    /// Location under which projects without an explicit location live.
    pub fn root_location(&self) -> &Location {
        &self.root
    }

    /// Returns true if a resource exists at `path`.
    pub fn exists(&self, path: &ResourcePath) -> bool {
        self.nodes.contains_key(path)
    }

    /// Returns true if the project called `name` exists and is open.
    pub fn is_open(&self, name: &str) -> bool {
        self.projects.get(name).is_some_and(|p| p.open)
    }

    /// All resources in path order.
    pub fn resources(&self) -> impl Iterator<Item = (&ResourcePath, &ResourceNode)> {
        self.nodes.iter()
    }

    /// Paths at or below `path`, in path order.
    pub fn subtree(&self, path: &ResourcePath) -> Vec<ResourcePath> {
        self.nodes
            .range(path.clone()..)
            .take_while(|(p, _)| path.is_prefix_of(p))
            .map(|(p, _)| p.clone())
            .collect()
    }

    fn project_entry(&self, name: &str, state: &ProjectState) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            open: state.open,
            location: state
                .location
                .clone()
                .unwrap_or_else(|| self.root.append(name)),
            explicit: state.location.is_some(),
        }
    }

    fn project_state_mut(&mut self, name: &str) -> Result<&mut ProjectState> {
        self.projects
            .get_mut(name)
            .ok_or_else(|| AliasError::ProjectNotFound(name.to_string()))
    }

    /// Checks that the project owning `path` exists and is open.
    fn check_open(&self, path: &ResourcePath) -> Result<()> {
        let name = path
            .project_name()
            .ok_or_else(|| AliasError::InvalidResourcePath(path.to_string()))?;
        match self.projects.get(name) {
            None => Err(AliasError::ProjectNotFound(name.to_string())),
            Some(state) if !state.open => Err(AliasError::ProjectClosed(name.to_string())),
            Some(_) => Ok(()),
        }
    }

    /// Checks that `path` can be created: below a project, absent, with an
    /// existing non-file parent in an open project.
    fn check_creatable(&self, path: &ResourcePath) -> Result<()> {
        if path.depth() < 2 {
            return Err(AliasError::invalid_operation(
                "create",
                path,
                "resources must live inside a project",
            ));
        }
        self.check_open(path)?;
        if self.nodes.contains_key(path) {
            return Err(AliasError::ResourceExists(path.to_string()));
        }
        match path.parent().and_then(|parent| self.nodes.get(&parent)) {
            Some(parent) if parent.kind == ResourceKind::File => Err(AliasError::invalid_operation(
                "create",
                path,
                "the parent is a file",
            )),
            Some(_) => Ok(()),
            None => Err(AliasError::ParentMissing(path.to_string())),
        }
    }

    /// Creates an open project. `location` of `None` means `<root>/<name>`.
    pub fn create_project(&mut self, name: &str, location: Option<Location>) -> Result<()> {
        if name.is_empty() || name.contains('/') {
            return Err(AliasError::InvalidResourcePath(format!("/{}", name)));
        }
        if self.projects.contains_key(name) {
            return Err(AliasError::ResourceExists(format!("/{}", name)));
        }
        self.projects.insert(
            name.to_string(),
            ProjectState {
                open: true,
                location,
            },
        );
        self.nodes.insert(
            ResourcePath::project(name),
            ResourceNode::plain(ResourceKind::Project),
        );
        Ok(())
    }

    /// Opens a project. Opening an open project is a no-op.
    pub fn open_project(&mut self, name: &str) -> Result<()> {
        self.project_state_mut(name)?.open = true;
        Ok(())
    }

    /// Closes a project. Its resources are kept but no longer tracked.
    pub fn close_project(&mut self, name: &str) -> Result<()> {
        self.project_state_mut(name)?.open = false;
        Ok(())
    }

    /// Deletes a project and all of its resources.
    pub fn delete_project(&mut self, name: &str) -> Result<()> {
        if self.projects.remove(name).is_none() {
            return Err(AliasError::ProjectNotFound(name.to_string()));
        }
        for path in self.subtree(&ResourcePath::project(name)) {
            self.nodes.remove(&path);
        }
        Ok(())
    }

    /// Changes the location of a project, keeping its resources.
    pub fn relocate_project(&mut self, name: &str, location: Option<Location>) -> Result<()> {
        self.project_state_mut(name)?.location = location;
        Ok(())
    }

    /// Creates a plain folder.
    pub fn create_folder(&mut self, path: &ResourcePath) -> Result<()> {
        self.check_creatable(path)?;
        self.nodes
            .insert(path.clone(), ResourceNode::plain(ResourceKind::Folder));
        Ok(())
    }

    /// Creates a plain file.
    pub fn create_file(&mut self, path: &ResourcePath) -> Result<()> {
        self.check_creatable(path)?;
        self.nodes
            .insert(path.clone(), ResourceNode::plain(ResourceKind::File));
        Ok(())
    }

    /// Creates a linked folder or file pointing at `target`.
    ///
    /// The target does not need to exist.
    pub fn create_link(
        &mut self,
        path: &ResourcePath,
        kind: ResourceKind,
        target: Location,
    ) -> Result<()> {
        if kind == ResourceKind::Project {
            return Err(AliasError::invalid_operation(
                "link",
                path,
                "only folders and files can be linked",
            ));
        }
        self.check_creatable(path)?;
        self.nodes.insert(
            path.clone(),
            ResourceNode {
                kind,
                link: Some(target),
            },
        );
        Ok(())
    }

    /// Deletes a resource and everything below it. Deleting a project path
    /// deletes the project.
    pub fn delete(&mut self, path: &ResourcePath) -> Result<()> {
        if path.is_project() {
            let name = path.project_name().unwrap_or_default().to_string();
            return self.delete_project(&name);
        }
        self.check_open(path)?;
        if !self.nodes.contains_key(path) {
            return Err(AliasError::ResourceNotFound(path.to_string()));
        }
        for doomed in self.subtree(path) {
            self.nodes.remove(&doomed);
        }
        Ok(())
    }

    /// Marks a content change. The tree itself does not change.
    pub fn touch(&self, path: &ResourcePath) -> Result<()> {
        self.check_open(path)?;
        if self.nodes.contains_key(path) {
            Ok(())
        } else {
            Err(AliasError::ResourceNotFound(path.to_string()))
        }
    }

    fn check_transfer(&self, operation: &str, from: &ResourcePath, to: &ResourcePath) -> Result<()> {
        if !self.nodes.contains_key(from) {
            return Err(AliasError::ResourceNotFound(from.to_string()));
        }
        if from.is_prefix_of(to) {
            return Err(AliasError::invalid_operation(
                operation,
                from,
                format!("destination {} is inside the source", to),
            ));
        }
        self.check_open(from)
    }

    /// Moves a resource and its subtree. Links keep their targets.
    ///
    /// Moving a project path to another top-level path renames the project.
    pub fn move_resource(&mut self, from: &ResourcePath, to: &ResourcePath) -> Result<()> {
        self.check_transfer("move", from, to)?;

        if from.is_project() {
            if !to.is_project() {
                return Err(AliasError::invalid_operation(
                    "move",
                    from,
                    "a project can only be renamed to another project name",
                ));
            }
            let (old, new) = (from.to_string(), to.to_string());
            let (old_name, new_name) = (&old[1..], &new[1..]);
            if self.projects.contains_key(new_name) {
                return Err(AliasError::ResourceExists(new));
            }
            let state = self
                .projects
                .remove(old_name)
                .ok_or_else(|| AliasError::ProjectNotFound(old_name.to_string()))?;
            self.projects.insert(new_name.to_string(), state);
        } else {
            self.check_creatable(to)?;
        }

        for path in self.subtree(from) {
            if let Some(node) = self.nodes.remove(&path) {
                if let Some(moved) = path.rebase(from, to) {
                    self.nodes.insert(moved, node);
                }
            }
        }
        Ok(())
    }

    /// Copies a resource and its subtree. Links are copied as links to the
    /// same target.
    pub fn copy_resource(&mut self, from: &ResourcePath, to: &ResourcePath) -> Result<()> {
        self.check_transfer("copy", from, to)?;
        if from.is_project() {
            return Err(AliasError::invalid_operation(
                "copy",
                from,
                "projects cannot be copied",
            ));
        }
        self.check_creatable(to)?;

        let copies: Vec<(ResourcePath, ResourceNode)> = self
            .nodes
            .range(from.clone()..)
            .take_while(|(p, _)| from.is_prefix_of(p))
            .filter_map(|(p, node)| p.rebase(from, to).map(|copy| (copy, node.clone())))
            .collect();
        self.nodes.extend(copies);
        Ok(())
    }
}

impl ResourceTree for MemoryTree {
    fn projects(&self) -> Vec<ProjectEntry> {
        self.projects
            .iter()
            .map(|(name, state)| self.project_entry(name, state))
            .collect()
    }

    fn project(&self, name: &str) -> Option<ProjectEntry> {
        self.projects
            .get(name)
            .map(|state| self.project_entry(name, state))
    }

    fn node(&self, path: &ResourcePath) -> Option<ResourceNode> {
        self.nodes.get(path).cloned()
    }

    fn children(&self, path: &ResourcePath) -> Result<Vec<ResourcePath>> {
        if !path.is_root() && !self.nodes.contains_key(path) {
            return Err(AliasError::TraversalFailed {
                path: path.to_string(),
                reason: "no such resource".to_string(),
            });
        }
        let depth = path.depth() + 1;
        Ok(self
            .nodes
            .range(path.clone()..)
            .take_while(|(p, _)| path.is_prefix_of(p))
            .filter(|(p, _)| p.depth() == depth)
            .map(|(p, _)| p.clone())
            .collect())
    }
}

/// TOML description of a workspace.
///
/// ```toml
/// root = "file:/ws"
///
/// [[project]]
/// name = "P1"
///
/// [[project]]
/// name = "P2"
/// location = "file:/elsewhere/P2"
/// open = false
///
/// [[resource]]
/// path = "/P1/shared"
/// kind = "folder"
/// link = "file:/data/shared"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceManifest {
    /// Parent location of projects without an explicit location.
    #[serde(default)]
    pub root: Option<Location>,

    /// Projects.
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectManifest>,

    /// Folders, files and links.
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceManifest>,
}

/// A `[[project]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Project name.
    pub name: String,
    /// Explicit location.
    #[serde(default)]
    pub location: Option<Location>,
    /// Whether the project is open (default: true).
    #[serde(default = "default_open")]
    pub open: bool,
}

/// A `[[resource]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceManifest {
    /// Workspace path.
    pub path: ResourcePath,
    /// Folder or file (default: folder).
    #[serde(default = "default_kind")]
    pub kind: ResourceKind,
    /// Link target; absent for plain resources.
    #[serde(default)]
    pub link: Option<Location>,
}

fn default_open() -> bool {
    true
}

fn default_kind() -> ResourceKind {
    ResourceKind::Folder
}

impl WorkspaceManifest {
    /// Parses a manifest from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AliasError::ManifestError(format!("failed to parse manifest: {}", e)))
    }

    /// Loads a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AliasError::ManifestError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }
}
