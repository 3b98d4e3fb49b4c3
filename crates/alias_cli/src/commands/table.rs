//! Location index dump.

use super::open_workspace;
use alias_core::ClaimKind;
use anyhow::{bail, Result};
use console::style;
use std::path::Path;

fn kind_label(kind: ClaimKind) -> &'static str {
    match kind {
        ClaimKind::ProjectRoot => "project",
        ClaimKind::RelocatedProject => "relocated",
        ClaimKind::LinkedFolder => "folder link",
        ClaimKind::LinkedFile => "file link",
    }
}

/// Print every indexed location with its claimants.
pub fn run(config_dir: &Path, manifest: &Path, format: &str) -> Result<()> {
    let ws = open_workspace(config_dir, manifest)?;
    let index = ws.aliases().index();

    match format {
        "json" => {
            let rows: Vec<_> = index
                .entries()
                .map(|(location, paths)| {
                    let claims: Vec<_> = paths
                        .iter()
                        .map(|path| {
                            serde_json::json!({
                                "path": path.to_string(),
                                "kind": index.claim(path).map(|c| kind_label(c.kind)),
                            })
                        })
                        .collect();
                    serde_json::json!({
                        "location": location.to_string(),
                        "claims": claims,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        "text" => {
            println!("{}", style("Location Index:").bold());
            for (location, paths) in index.entries() {
                println!("  {}", style(location).cyan());
                for path in paths {
                    let kind = index.claim(path).map(|c| kind_label(c.kind)).unwrap_or("?");
                    println!("    {} {}", path, style(format!("[{}]", kind)).dim());
                }
            }
            println!();
            println!(
                "  {} claims, {} locations, fingerprint {}",
                style(index.len()).cyan(),
                style(index.location_count()).cyan(),
                style(&index.fingerprint()?[..16]).dim()
            );
        }
        other => bail!("Unknown format '{}'. Use 'text' or 'json'", other),
    }

    Ok(())
}
