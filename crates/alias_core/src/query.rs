//! Alias queries against the location index.

use crate::config::QueryConfig;
use crate::index::LocationIndex;
use crate::location::Location;
use crate::resource_path::ResourcePath;
use std::collections::BTreeSet;

/// Returns the other resources whose location equals or overlaps `location`,
/// the resolved location of `resource`.
///
/// Each alias is reported at the tree position that resolves to the queried
/// location: a claim `(L', R')` above `location` yields `R'` followed by the
/// segments of `location` below `L'`. A claim below `location` yields `R'`
/// itself unless it is plain nesting inside `resource`.
///
/// Returns `None` when there is no alias, when the location is opaque, and
/// when the project of `resource` is not indexed (closed or unknown).
pub fn compute_aliases(
    index: &LocationIndex,
    resource: &ResourcePath,
    location: &Location,
    config: &QueryConfig,
) -> Option<BTreeSet<ResourcePath>> {
    if !index.has_non_default_claims() || location.is_opaque() {
        return None;
    }
    index.claim(&resource.project_path()?)?;

    let mut aliases = BTreeSet::new();

    for (claimed, owner) in index.ancestors_or_equal(location) {
        let Some(rest) = location.relative_to(claimed) else {
            continue;
        };
        // Nothing lives below a linked file.
        if !rest.is_empty() && index.claim(owner).is_some_and(|c| c.kind.is_file()) {
            continue;
        }
        let candidate = owner.join(rest);
        if candidate == *resource {
            continue;
        }
        // A deeper claim on the candidate's own path re-routes it elsewhere.
        let covered_by_owner = index
            .covering_claim(&candidate)
            .is_some_and(|(covering, _)| covering == *owner);
        if covered_by_owner {
            aliases.insert(candidate);
        }
    }

    if config.include_descendants {
        for (claimed, owner) in index.descendants(location) {
            if *owner == *resource || is_natural_descendant(resource, location, owner, claimed) {
                continue;
            }
            aliases.insert(owner.clone());
        }
    }

    if aliases.is_empty() {
        None
    } else {
        Some(aliases)
    }
}

/// True if `owner` lies below `resource` exactly where the tree would put it
/// without a link.
fn is_natural_descendant(
    resource: &ResourcePath,
    location: &Location,
    owner: &ResourcePath,
    claimed: &Location,
) -> bool {
    match owner.strip_prefix(resource) {
        Some(rest) => location.join(rest) == claimed.path_only(),
        None => false,
    }
}
