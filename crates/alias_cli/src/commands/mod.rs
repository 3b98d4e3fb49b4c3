//! CLI commands.

pub mod debug;
pub mod query;
pub mod replay;
pub mod table;
pub mod verify;

use alias_core::{Config, ResourcePath, Workspace, WorkspaceManifest};
use anyhow::{Context, Result};
use console::style;
use std::collections::BTreeSet;
use std::path::Path;

/// Loads `aliases.toml` from `config_dir` and builds the workspace described
/// by `manifest`.
pub(crate) fn open_workspace(config_dir: &Path, manifest: &Path) -> Result<Workspace> {
    let config = Config::load(config_dir)
        .with_context(|| format!("Failed to load config from {}", config_dir.display()))?;
    let manifest = WorkspaceManifest::load(manifest)?;
    Workspace::from_manifest(&manifest, config).context("Failed to build workspace from manifest")
}

pub(crate) fn parse_path(input: &str) -> Result<ResourcePath> {
    ResourcePath::parse(input).with_context(|| format!("Invalid resource path: {}", input))
}

/// Prints one resource with its aliases.
pub(crate) fn print_aliases(ws: &Workspace, path: &ResourcePath) {
    let location = ws
        .location_of(path)
        .map(|l| l.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("{} {}", style(path).cyan().bold(), style(location).dim());
    match ws.aliases_of(path) {
        Some(aliases) => {
            for alias in aliases {
                println!("  {} {}", style("↔").yellow(), alias);
            }
        }
        None => println!("  {}", style("no aliases").dim()),
    }
}

pub(crate) fn aliases_json(ws: &Workspace, path: &ResourcePath) -> serde_json::Value {
    let aliases: BTreeSet<String> = ws
        .aliases_of(path)
        .unwrap_or_default()
        .iter()
        .map(|p| p.to_string())
        .collect();
    serde_json::json!({
        "path": path.to_string(),
        "location": ws.location_of(path).map(|l| l.to_string()),
        "aliases": aliases,
    })
}
