//! Lifecycle owner of the location index.

use crate::builder::{rebuild, RebuildReport};
use crate::config::Config;
use crate::error::{AliasError, Result};
use crate::events::ChangeEvent;
use crate::index::LocationIndex;
use crate::location::Location;
use crate::query;
use crate::resource_path::ResourcePath;
use crate::tree::ResourceTree;
use crate::updater::{apply, IndexEdits};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Owns the location index and keeps it in step with the resource tree.
///
/// The manager is stopped until [`startup`](Self::startup) builds the index.
/// While stopped it ignores change events and answers every query with
/// `None`.
#[derive(Debug, Clone, Default)]
pub struct AliasManager {
    config: Config,
    index: LocationIndex,
    running: bool,
}

impl AliasManager {
    /// Creates a stopped manager.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: LocationIndex::new(),
            running: false,
        }
    }

    /// Rebuilds the index from `tree`, discarding all incremental state.
    ///
    /// Used at workspace open and to recover from a suspected stale index.
    pub fn startup<T: ResourceTree + ?Sized>(&mut self, tree: &T) -> RebuildReport {
        let (index, report) = rebuild(tree);
        info!(
            claims = index.len(),
            locations = index.location_count(),
            "Alias index built: {}",
            report.summary()
        );
        self.index = index;
        self.running = true;
        report
    }

    /// Clears the index and stops tracking changes.
    pub fn shutdown(&mut self) {
        self.index.clear();
        self.running = false;
        info!("Alias manager shut down");
    }

    /// Returns true between `startup` and `shutdown`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current index.
    pub fn index(&self) -> &LocationIndex {
        &self.index
    }

    /// Applies a change event. `tree` must already reflect the change.
    pub fn handle<T: ResourceTree + ?Sized>(&mut self, event: &ChangeEvent, tree: &T) -> IndexEdits {
        if !self.running {
            debug!(event = %event, "Alias manager not running; ignoring change event");
            return IndexEdits::default();
        }

        let edits = apply(&mut self.index, event, tree);

        if self.config.index.verify_incremental {
            let (rebuilt, _) = rebuild(tree);
            if rebuilt != self.index {
                let (missing, unexpected) = self.index.differences(&rebuilt);
                warn!(
                    event = %event,
                    missing = missing.len(),
                    unexpected = unexpected.len(),
                    "Alias index diverged from rebuild; replacing it"
                );
                self.index = rebuilt;
            }
        }
        edits
    }

    /// Other resources overlapping `location`, the resolved location of
    /// `resource`. See [`query::compute_aliases`].
    pub fn compute_aliases(
        &self,
        resource: &ResourcePath,
        location: &Location,
    ) -> Option<BTreeSet<ResourcePath>> {
        if !self.running {
            return None;
        }
        query::compute_aliases(&self.index, resource, location, &self.config.query)
    }

    /// Compares the current index with a fresh rebuild from `tree`.
    pub fn verify<T: ResourceTree + ?Sized>(&self, tree: &T) -> Result<VerifyReport> {
        let (rebuilt, _) = rebuild(tree);
        let (missing, unexpected) = self.index.differences(&rebuilt);
        Ok(VerifyReport {
            consistent: missing.is_empty() && unexpected.is_empty(),
            missing,
            unexpected,
            incremental_fingerprint: self.index.fingerprint()?,
            rebuilt_fingerprint: rebuilt.fingerprint()?,
        })
    }
}

/// Result of comparing the live index with a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// True if both indexes hold the same claims.
    pub consistent: bool,
    /// Claims the rebuild has and the live index lacks (or holds differently).
    pub missing: Vec<ResourcePath>,
    /// Claims the live index has and the rebuild does not.
    pub unexpected: Vec<ResourcePath>,
    /// Fingerprint of the live index.
    pub incremental_fingerprint: String,
    /// Fingerprint of the rebuild.
    pub rebuilt_fingerprint: String,
}

impl VerifyReport {
    /// Returns a summary message.
    pub fn summary(&self) -> String {
        if self.consistent {
            "Alias index matches a full rebuild.".to_string()
        } else {
            format!(
                "Alias index diverged: {} missing, {} unexpected",
                self.missing.len(),
                self.unexpected.len()
            )
        }
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AliasError::Serialization(format!("failed to encode report: {}", e)))
    }
}
