//! Incremental maintenance of the location index.
//!
//! [`apply`] maps `(index, event, tree)` to the edits that bring the index in
//! line with the tree *after* the mutation the event reports. It never looks
//! at anything else, so replaying the same events against the same trees
//! always yields the same index, and that index equals a full rebuild.

use crate::builder::{index_project, index_subtree, RebuildReport};
use crate::events::ChangeEvent;
use crate::index::{Claim, ClaimKind, LocationIndex};
use crate::resource_path::ResourcePath;
use crate::tree::ResourceTree;
use tracing::debug;

/// Claims added and removed by one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEdits {
    /// Paths whose claim was added or changed.
    pub inserted: Vec<ResourcePath>,
    /// Paths whose claim was dropped or changed.
    pub removed: Vec<ResourcePath>,
}

impl IndexEdits {
    /// Returns true if the index did not change.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }

    fn merge(&mut self, other: IndexEdits) {
        self.inserted.extend(other.inserted);
        self.removed.extend(other.removed);
    }

    fn between(before: Vec<(ResourcePath, Claim)>, after: Vec<(ResourcePath, Claim)>) -> Self {
        let removed = before
            .iter()
            .filter(|entry| !after.contains(entry))
            .map(|(path, _)| path.clone())
            .collect();
        let inserted = after
            .iter()
            .filter(|entry| !before.contains(entry))
            .map(|(path, _)| path.clone())
            .collect();
        Self { inserted, removed }
    }
}

/// Applies one change event to `index`.
///
/// `tree` must already reflect the change.
pub fn apply<T: ResourceTree + ?Sized>(
    index: &mut LocationIndex,
    event: &ChangeEvent,
    tree: &T,
) -> IndexEdits {
    let edits = match event {
        ChangeEvent::ContentChanged { .. } => IndexEdits::default(),
        ChangeEvent::Created { path } | ChangeEvent::Copied { to: path, .. } => {
            reindex(index, tree, path)
        }
        ChangeEvent::Deleted { path } | ChangeEvent::LinkRemoved { path } => forget(index, path),
        ChangeEvent::Moved { from, to } => {
            let mut edits = forget(index, from);
            edits.merge(reindex(index, tree, to));
            edits
        }
        ChangeEvent::LinkAdded { path, location } => match tree.node(path) {
            Some(node) if project_is_open(tree, path) => {
                let claim = Claim::new(location.clone(), ClaimKind::link(node.kind));
                if index.insert(path.clone(), claim) {
                    IndexEdits {
                        inserted: vec![path.clone()],
                        removed: Vec::new(),
                    }
                } else {
                    IndexEdits::default()
                }
            }
            _ => IndexEdits::default(),
        },
        ChangeEvent::ProjectCreated { name }
        | ChangeEvent::ProjectOpened { name }
        | ChangeEvent::ProjectRelocated { name } => {
            reindex(index, tree, &ResourcePath::project(name))
        }
        ChangeEvent::ProjectClosed { name } | ChangeEvent::ProjectDeleted { name } => {
            forget(index, &ResourcePath::project(name))
        }
    };

    debug!(
        event = %event,
        inserted = edits.inserted.len(),
        removed = edits.removed.len(),
        "Applied change event to alias index"
    );
    edits
}

fn project_is_open<T: ResourceTree + ?Sized>(tree: &T, path: &ResourcePath) -> bool {
    path.project_name()
        .and_then(|name| tree.project(name))
        .is_some_and(|project| project.open)
}

/// Drops every claim at or below `root`.
fn forget(index: &mut LocationIndex, root: &ResourcePath) -> IndexEdits {
    IndexEdits {
        inserted: Vec::new(),
        removed: index
            .remove_subtree(root)
            .into_iter()
            .map(|(path, _)| path)
            .collect(),
    }
}

/// Replaces the claims at or below `root` with what the tree holds now.
fn reindex<T: ResourceTree + ?Sized>(
    index: &mut LocationIndex,
    tree: &T,
    root: &ResourcePath,
) -> IndexEdits {
    let before = index.remove_subtree(root);

    let mut report = RebuildReport::default();
    if root.is_project() {
        if let Some(project) = root.project_name().and_then(|name| tree.project(name)) {
            index_project(index, tree, &project, &mut report);
        }
    } else if project_is_open(tree, root) {
        index_subtree(index, tree, root, &mut report);
    }

    let after = index
        .claims_under(root)
        .map(|(path, claim)| (path.clone(), claim.clone()))
        .collect();
    IndexEdits::between(before, after)
}
