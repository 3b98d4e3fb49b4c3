//! Index verification command.

use super::open_workspace;
use alias_core::Script;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Compare the live index with a full rebuild.
pub fn run(config_dir: &Path, manifest: &Path, script: Option<&Path>, json: bool) -> Result<()> {
    let mut ws = open_workspace(config_dir, manifest)?;

    if let Some(script) = script {
        let script = Script::load(script)?;
        for (number, step) in script.steps.iter().enumerate() {
            ws.apply(step)
                .with_context(|| format!("Step {} failed: {:?}", number + 1, step))?;
        }
    }

    let report = ws.verify()?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("{}", style("Verification Report:").bold());
    println!(
        "  Claims indexed:     {}",
        style(ws.aliases().index().len()).cyan()
    );
    println!(
        "  Live fingerprint:   {}",
        style(&report.incremental_fingerprint).dim()
    );
    println!(
        "  Rebuilt fingerprint: {}",
        style(&report.rebuilt_fingerprint).dim()
    );
    for path in &report.missing {
        println!("    {} missing {}", style("×").red(), path);
    }
    for path in &report.unexpected {
        println!("    {} unexpected {}", style("×").red(), path);
    }

    println!();
    if report.consistent {
        println!("{} {}", style("✓").green(), style(report.summary()).green());
    } else {
        println!("{}", style(report.summary()).yellow().bold());
        println!();
        println!("{}", style("Recommendations:").bold());
        println!(
            "  {} Set {} in aliases.toml to repair the index after each change",
            style("→").cyan(),
            style("index.verify_incremental = true").cyan()
        );
    }

    Ok(())
}
