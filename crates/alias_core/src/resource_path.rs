//! Logical workspace-tree paths.

use crate::error::{AliasError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Absolute path of a resource in the workspace tree, e.g. `/Project/src/lib.rs`.
///
/// The first segment names the project. Paths order segment by segment, so a
/// path always sorts immediately before its own descendants.
///
/// # Examples
///
/// ```
/// use alias_core::ResourcePath;
///
/// let file: ResourcePath = "/Project/src/lib.rs".parse().unwrap();
/// assert_eq!(file.project_name(), Some("Project"));
/// assert_eq!(file.name(), Some("lib.rs"));
/// assert!(ResourcePath::project("Project").is_prefix_of(&file));
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// The workspace root (`/`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the project called `name`.
    pub fn project(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    /// Parses an absolute workspace path.
    ///
    /// # Errors
    ///
    /// Returns `AliasError::InvalidResourcePath` if the path does not start
    /// with `/` or contains `.` or `..` segments.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(AliasError::InvalidResourcePath(input.to_string()));
        };
        let mut segments = Vec::new();
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(AliasError::InvalidResourcePath(input.to_string()));
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Path segments, starting with the project name.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (0 for the root, 1 for a project).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the workspace root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if this path names a project.
    pub fn is_project(&self) -> bool {
        self.segments.len() == 1
    }

    /// Name of the owning project.
    pub fn project_name(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Path of the owning project.
    pub fn project_path(&self) -> Option<ResourcePath> {
        self.project_name().map(Self::project)
    }

    /// Last segment.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Parent path, or `None` for the root.
    pub fn parent(&self) -> Option<ResourcePath> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Path of the child called `name`.
    pub fn append(&self, name: &str) -> ResourcePath {
        self.join(&[name])
    }

    /// Path of the descendant reached through `segments`.
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> ResourcePath {
        let mut joined = self.segments.clone();
        joined.extend(segments.iter().map(|s| s.as_ref().to_string()));
        Self { segments: joined }
    }

    /// Returns true if `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &ResourcePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Segments of `self` below `prefix`.
    pub fn strip_prefix(&self, prefix: &ResourcePath) -> Option<&[String]> {
        self.segments.strip_prefix(prefix.segments.as_slice())
    }

    /// Moves `self` from under `from` to under `to`.
    ///
    /// Returns `None` if `self` is not at or below `from`.
    pub fn rebase(&self, from: &ResourcePath, to: &ResourcePath) -> Option<ResourcePath> {
        self.strip_prefix(from).map(|rest| to.join(rest))
    }

    /// This path and all of its ancestors, deepest first. The root is not
    /// included.
    pub fn ancestors(&self) -> impl Iterator<Item = ResourcePath> + '_ {
        (1..=self.segments.len()).rev().map(move |len| Self {
            segments: self.segments[..len].to_vec(),
        })
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourcePath({})", self)
    }
}

impl FromStr for ResourcePath {
    type Err = AliasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourcePath {
    type Error = AliasError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ResourcePath> for String {
    fn from(path: ResourcePath) -> Self {
        path.to_string()
    }
}
