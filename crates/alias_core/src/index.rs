//! Ordered index from physical locations to the resources claiming them.
//!
//! Only *claims* are stored: the root of every open project and every linked
//! resource. A plain resource's location is its covering claim's location plus
//! the remaining path segments, so it never needs an entry of its own.
//!
//! Lookups rely on the location order: all descendants of `L` sort inside
//! `[L, bound(L))`, and the keys sharing `L`'s path (with or without query or
//! fragment) sit directly after `L` without them.

use crate::error::{AliasError, Result};
use crate::location::Location;
use crate::resource_path::ResourcePath;
use crate::tree::ResourceKind;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Why a resource has an entry in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    /// Project at its default location `<root>/<name>`.
    ProjectRoot,
    /// Project with a user-chosen location.
    RelocatedProject,
    /// Linked folder.
    LinkedFolder,
    /// Linked file. Nothing can live below it.
    LinkedFile,
}

impl ClaimKind {
    /// Claim kind of a linked resource of `kind`.
    pub fn link(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::File => ClaimKind::LinkedFile,
            ResourceKind::Folder | ResourceKind::Project => ClaimKind::LinkedFolder,
        }
    }

    /// Default project roots cannot overlap anything on their own.
    pub fn is_default(self) -> bool {
        self == ClaimKind::ProjectRoot
    }

    /// Returns true if the claimant is a file.
    pub fn is_file(self) -> bool {
        self == ClaimKind::LinkedFile
    }
}

/// Location claimed by a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claimed location.
    pub location: Location,
    /// Claim kind.
    pub kind: ClaimKind,
}

impl Claim {
    /// Creates a claim.
    pub fn new(location: Location, kind: ClaimKind) -> Self {
        Self { location, kind }
    }
}

/// Location index.
///
/// Equality is structural: two indexes are equal when they hold the same
/// claims. A rebuild from the current tree is the reference state every
/// incremental update must converge to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationIndex {
    locations: BTreeMap<Location, BTreeSet<ResourcePath>>,
    claims: BTreeMap<ResourcePath, Claim>,
    non_default: usize,
}

impl LocationIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `claim` for `path`, replacing any previous claim of the path.
    ///
    /// Returns false if the exact claim was already present.
    pub fn insert(&mut self, path: ResourcePath, claim: Claim) -> bool {
        if self.claims.get(&path) == Some(&claim) {
            return false;
        }
        self.remove(&path);

        self.locations
            .entry(claim.location.clone())
            .or_default()
            .insert(path.clone());
        if !claim.kind.is_default() {
            self.non_default += 1;
        }
        self.claims.insert(path, claim);
        true
    }

    /// Removes the claim of `path`.
    pub fn remove(&mut self, path: &ResourcePath) -> Option<Claim> {
        let claim = self.claims.remove(path)?;
        if let Some(paths) = self.locations.get_mut(&claim.location) {
            paths.remove(path);
            if paths.is_empty() {
                self.locations.remove(&claim.location);
            }
        }
        if !claim.kind.is_default() {
            self.non_default -= 1;
        }
        Some(claim)
    }

    /// Removes the claims of `path` and of every resource below it.
    pub fn remove_subtree(&mut self, path: &ResourcePath) -> Vec<(ResourcePath, Claim)> {
        let doomed: Vec<ResourcePath> = self.claims_under(path).map(|(p, _)| p.clone()).collect();
        doomed
            .into_iter()
            .filter_map(|p| self.remove(&p).map(|claim| (p, claim)))
            .collect()
    }

    /// Claims of `path` and of every resource below it, in path order.
    pub fn claims_under<'a>(
        &'a self,
        path: &'a ResourcePath,
    ) -> impl Iterator<Item = (&'a ResourcePath, &'a Claim)> + 'a {
        self.claims
            .range(path.clone()..)
            .take_while(move |(p, _)| path.is_prefix_of(p))
    }

    /// The claim recorded for exactly `path`.
    pub fn claim(&self, path: &ResourcePath) -> Option<&Claim> {
        self.claims.get(path)
    }

    /// The deepest claim at or above `path`: the one `path`'s location
    /// derives from.
    pub fn covering_claim(&self, path: &ResourcePath) -> Option<(ResourcePath, &Claim)> {
        path.ancestors()
            .find_map(|ancestor| self.claims.get(&ancestor).map(|claim| (ancestor, claim)))
    }

    /// Entries whose location equals `location` or is a path-ancestor of it.
    ///
    /// Walks the parent chain from `location` up to the volume root. At each
    /// level the keys with exactly that path are read as one bounded range,
    /// so keys differing only in query or fragment are found too.
    pub fn ancestors_or_equal(&self, location: &Location) -> Vec<(&Location, &ResourcePath)> {
        let mut found = Vec::new();
        if location.is_opaque() {
            if let Some((key, paths)) = self.locations.get_key_value(location) {
                found.extend(paths.iter().map(|p| (key, p)));
            }
            return found;
        }

        for count in (0..=location.segment_count()).rev() {
            let level = location.truncated(count);
            let same_path = self
                .locations
                .range(level.clone()..)
                .take_while(|(key, _)| level.is_prefix_of(key) && key.segment_count() == count);
            for (key, paths) in same_path {
                found.extend(paths.iter().map(|p| (key, p)));
            }
        }
        found
    }

    /// Entries whose location lies strictly below `location`.
    ///
    /// Reads the range `[location, bound(location))`.
    pub fn descendants(&self, location: &Location) -> Vec<(&Location, &ResourcePath)> {
        if location.is_opaque() {
            return Vec::new();
        }
        let depth = location.segment_count();
        self.locations
            .range(location.path_only()..)
            .take_while(|(key, _)| key.cmp_upper_bound(location) == Ordering::Less)
            .filter(|(key, _)| key.segment_count() > depth)
            .flat_map(|(key, paths)| paths.iter().map(move |p| (key, p)))
            .collect()
    }

    /// Returns true if any link or relocated project is indexed. Without
    /// one, no two resources can overlap.
    pub fn has_non_default_claims(&self) -> bool {
        self.non_default > 0
    }

    /// Number of claims.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Number of distinct claimed locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Drops every claim.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.claims.clear();
        self.non_default = 0;
    }

    /// Locations with their claimants, in location order.
    pub fn entries(&self) -> impl Iterator<Item = (&Location, &BTreeSet<ResourcePath>)> {
        self.locations.iter()
    }

    /// Claims in path order.
    pub fn claims(&self) -> impl Iterator<Item = (&ResourcePath, &Claim)> {
        self.claims.iter()
    }

    /// Compares `self` with `expected`.
    ///
    /// Returns `(missing, unexpected)`: paths whose expected claim is absent
    /// or different here, and paths claimed here but not in `expected`.
    pub fn differences(&self, expected: &LocationIndex) -> (Vec<ResourcePath>, Vec<ResourcePath>) {
        let missing = expected
            .claims
            .iter()
            .filter(|(path, claim)| self.claims.get(*path) != Some(*claim))
            .map(|(path, _)| path.clone())
            .collect();
        let unexpected = self
            .claims
            .iter()
            .filter(|(path, claim)| expected.claims.get(*path) != Some(*claim))
            .map(|(path, _)| path.clone())
            .collect();
        (missing, unexpected)
    }

    /// BLAKE3 digest (hex) of the postcard encoding of the claims.
    ///
    /// Equal indexes have equal fingerprints.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = postcard::to_allocvec(&self.claims)
            .map_err(|e| AliasError::Serialization(format!("failed to encode index: {}", e)))?;
        Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
    }
}
