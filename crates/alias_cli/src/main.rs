//! Aliases CLI - inspect resource aliasing in a workspace manifest.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "aliases")]
#[command(about = "Detect overlapping resource locations in a workspace", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding aliases.toml
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the aliases of resources
    Query {
        /// Workspace manifest (TOML)
        manifest: PathBuf,
        /// Resource paths, e.g. /Project/folder
        #[arg(required = true)]
        paths: Vec<String>,
        /// Output format (json, text)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Dump the location index
    Table {
        /// Workspace manifest (TOML)
        manifest: PathBuf,
        /// Output format (json, text)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Apply a mutation script and report the resulting aliases
    Replay {
        /// Workspace manifest (TOML)
        manifest: PathBuf,
        /// Script of [[step]] operations (TOML)
        script: PathBuf,
        /// Report rejected steps instead of stopping at the first one
        #[arg(long)]
        keep_going: bool,
        /// Resource paths to query after the replay
        #[arg(short, long)]
        query: Vec<String>,
    },
    /// Compare the incrementally maintained index with a full rebuild
    Verify {
        /// Workspace manifest (TOML)
        manifest: PathBuf,
        /// Script to replay before verifying
        #[arg(long)]
        script: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Debug and inspection commands
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// Compare two locations
    Compare {
        /// First location
        a: String,
        /// Second location
        b: String,
    },
    /// Show the parsed components of a location
    Location {
        /// Location (URI or absolute path)
        location: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_dir = cli.config_dir.as_path();

    match cli.command {
        Commands::Query {
            manifest,
            paths,
            format,
        } => commands::query::run(config_dir, &manifest, &paths, &format),
        Commands::Table { manifest, format } => commands::table::run(config_dir, &manifest, &format),
        Commands::Replay {
            manifest,
            script,
            keep_going,
            query,
        } => commands::replay::run(config_dir, &manifest, &script, keep_going, &query),
        Commands::Verify {
            manifest,
            script,
            json,
        } => commands::verify::run(config_dir, &manifest, script.as_deref(), json),
        Commands::Debug { command } => match command {
            DebugCommands::Compare { a, b } => commands::debug::compare(&a, &b),
            DebugCommands::Location { location } => commands::debug::location(&location),
        },
    }
}
