use alias_core::{Config, Workspace, WorkspaceManifest, CONFIG_FILE};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the manifest file inside a fixture directory
pub const MANIFEST_FILE: &str = "workspace.toml";

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Scratch directory holding a scenario's manifest and aliases.toml
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Scratch directory with no manifest: the scenario starts from an
    /// empty workspace
    pub fn empty() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create scratch directory")?;
        Ok(Self { dir })
    }

    /// Scratch directory seeded with the files of `fixtures/<name>`
    pub fn from_fixture(name: &str) -> Result<Self> {
        let source = fixtures_root().join(name);
        if !source.is_dir() {
            bail!("Unknown fixture '{}' (looked in {})", name, source.display());
        }

        let env = Self::empty()?;
        // Fixtures are flat: a manifest and optionally a config file
        for entry in fs::read_dir(&source)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::copy(entry.path(), env.path().join(entry.file_name()))
                    .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            }
        }
        Ok(env)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrite a file of the scratch directory
    pub fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        fs::write(self.path().join(name), content)
            .with_context(|| format!("Failed to write {}", name))
    }

    /// Replace aliases.toml
    pub fn write_config(&self, toml: &str) -> Result<()> {
        self.write_file(CONFIG_FILE, toml.as_bytes())
    }

    /// Load aliases.toml, falling back to defaults
    pub fn config(&self) -> Result<Config> {
        Ok(Config::load(self.path())?)
    }

    /// Build the workspace described by the manifest, or an empty one
    pub fn open(&self, config: Config) -> Result<Workspace> {
        let manifest_path = self.path().join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Ok(Workspace::empty(config)?);
        }
        let manifest = WorkspaceManifest::load(&manifest_path)?;
        Ok(Workspace::from_manifest(&manifest, config)?)
    }
}
