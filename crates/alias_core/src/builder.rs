//! Full rebuild of the location index from a resource tree.

use crate::index::{Claim, ClaimKind, LocationIndex};
use crate::resource_path::ResourcePath;
use crate::tree::{ProjectEntry, ResourceTree};
use tracing::warn;

/// Report from an index rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Number of open projects indexed.
    pub projects_indexed: usize,
    /// Number of closed projects skipped.
    pub projects_skipped_closed: usize,
    /// Number of linked resources indexed.
    pub links_indexed: usize,
    /// Resources whose children could not be listed.
    pub skipped: Vec<ResourcePath>,
}

impl RebuildReport {
    /// Returns a one-line summary.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} projects indexed, {} closed, {} links",
            self.projects_indexed, self.projects_skipped_closed, self.links_indexed
        );
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", {} resources skipped", self.skipped.len()));
        }
        summary
    }
}

/// Builds a fresh index from every open project of `tree`.
pub fn rebuild<T: ResourceTree + ?Sized>(tree: &T) -> (LocationIndex, RebuildReport) {
    let mut index = LocationIndex::new();
    let mut report = RebuildReport::default();
    for project in tree.projects() {
        index_project(&mut index, tree, &project, &mut report);
    }
    (index, report)
}

/// Indexes one project: its root claim and every link below it.
///
/// Closed projects contribute nothing.
pub fn index_project<T: ResourceTree + ?Sized>(
    index: &mut LocationIndex,
    tree: &T,
    project: &ProjectEntry,
    report: &mut RebuildReport,
) {
    if !project.open {
        report.projects_skipped_closed += 1;
        return;
    }
    let kind = if project.explicit {
        ClaimKind::RelocatedProject
    } else {
        ClaimKind::ProjectRoot
    };
    index.insert(project.path(), Claim::new(project.location.clone(), kind));
    report.projects_indexed += 1;
    index_subtree(index, tree, &project.path(), report);
}

/// Claims every link at or below `path`.
///
/// Link targets are never resolved, so a dangling link is indexed like any
/// other. A node whose children cannot be listed is logged, recorded in
/// `report.skipped` and left out; traversal continues with its siblings.
pub fn index_subtree<T: ResourceTree + ?Sized>(
    index: &mut LocationIndex,
    tree: &T,
    path: &ResourcePath,
    report: &mut RebuildReport,
) {
    let mut stack = vec![path.clone()];
    while let Some(current) = stack.pop() {
        let Some(node) = tree.node(&current) else {
            continue;
        };
        if let Some(target) = node.link {
            let claim = Claim::new(target, ClaimKind::link(node.kind));
            index.insert(current.clone(), claim);
            report.links_indexed += 1;
        }

        match tree.children(&current) {
            Ok(children) => stack.extend(children.into_iter().rev()),
            Err(e) => {
                warn!(
                    path = %current,
                    error = %e,
                    "Skipping resource during alias index rebuild"
                );
                report.skipped.push(current);
            }
        }
    }
}
