//! Alias query command.

use super::{aliases_json, open_workspace, parse_path, print_aliases};
use anyhow::{bail, Result};
use std::path::Path;

/// Print the aliases of each path.
pub fn run(config_dir: &Path, manifest: &Path, paths: &[String], format: &str) -> Result<()> {
    let ws = open_workspace(config_dir, manifest)?;
    let paths = paths
        .iter()
        .map(|p| parse_path(p))
        .collect::<Result<Vec<_>>>()?;

    match format {
        "json" => {
            let results: Vec<_> = paths.iter().map(|p| aliases_json(&ws, p)).collect();
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        "text" => {
            for path in &paths {
                print_aliases(&ws, path);
            }
        }
        other => bail!("Unknown format '{}'. Use 'text' or 'json'", other),
    }

    Ok(())
}
