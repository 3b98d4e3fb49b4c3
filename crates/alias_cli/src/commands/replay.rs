//! Script replay command.

use super::{open_workspace, parse_path, print_aliases};
use alias_core::Script;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Replay `script` against the workspace, then print the queried aliases.
pub fn run(
    config_dir: &Path,
    manifest: &Path,
    script: &Path,
    keep_going: bool,
    queries: &[String],
) -> Result<()> {
    let mut ws = open_workspace(config_dir, manifest)?;
    let script = Script::load(script)?;

    let pb = ProgressBar::new(script.steps.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut rejected = Vec::new();
    for (number, step) in script.steps.iter().enumerate() {
        pb.set_message(format!("{:?}", step));
        if let Err(e) = ws.apply(step) {
            if !keep_going {
                pb.abandon();
                return Err(e).with_context(|| format!("Step {} failed: {:?}", number + 1, step));
            }
            rejected.push((number + 1, e));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "{} Replayed {} steps",
        style("✓").green(),
        script.steps.len() - rejected.len()
    );
    for (number, e) in &rejected {
        println!("  {} step {}: {}", style("⚠").yellow(), number, e);
    }

    let report = ws.verify()?;
    if report.consistent {
        println!("{} {}", style("✓").green(), style(report.summary()).green());
    } else {
        println!("{}", style(report.summary()).yellow().bold());
    }

    if !queries.is_empty() {
        println!();
        for query in queries {
            print_aliases(&ws, &parse_path(query)?);
        }
    }

    Ok(())
}
