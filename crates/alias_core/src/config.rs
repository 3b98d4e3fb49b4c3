//! Configuration for the alias subsystem.

use crate::error::{AliasError, Result};
use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file inside a configuration directory.
pub const CONFIG_FILE: &str = "aliases.toml";

/// Alias subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Workspace defaults.
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Index maintenance.
    #[serde(default)]
    pub index: IndexConfig,

    /// Alias queries.
    #[serde(default)]
    pub query: QueryConfig,
}

impl Config {
    /// Load configuration from `aliases.toml` in `dir`, or the defaults if
    /// the file does not exist.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| AliasError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| AliasError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `aliases.toml` in `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| AliasError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| AliasError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Workspace defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Parent location of projects when a manifest names no root
    /// (default: "file:/workspace").
    pub default_root: String,
}

impl WorkspaceConfig {
    /// Parses `default_root`.
    pub fn root_location(&self) -> Result<Location> {
        Location::parse(&self.default_root).map_err(|e| {
            AliasError::ConfigError(format!("workspace.default_root: {}", e))
        })
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            default_root: "file:/workspace".to_string(),
        }
    }
}

/// Index maintenance settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IndexConfig {
    /// Compare the index with a full rebuild after every change event and
    /// replace it on divergence (default: false). Slow; meant for debugging.
    pub verify_incremental: bool,
}

/// Query settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryConfig {
    /// Report claims below the queried location as aliases (default: true).
    pub include_descendants: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            include_descendants: true,
        }
    }
}
