//! Error types for alias_core operations.

use thiserror::Error;

/// Core error type for alias_core operations.
#[derive(Error, Debug)]
pub enum AliasError {
    /// The string could not be read as a file-system location.
    #[error("invalid location '{input}': {reason}")]
    InvalidLocation {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// The string is not an absolute workspace path.
    #[error("invalid resource path '{0}'")]
    InvalidResourcePath(String),

    /// No resource exists at the given workspace path.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// A resource already exists at the given workspace path.
    #[error("resource already exists: {0}")]
    ResourceExists(String),

    /// The parent of the given path does not exist.
    #[error("parent of {0} does not exist")]
    ParentMissing(String),

    /// No project with the given name exists.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The project exists but is closed.
    #[error("project is closed: {0}")]
    ProjectClosed(String),

    /// The requested tree operation is not allowed.
    #[error("cannot {operation} {path}: {reason}")]
    InvalidOperation {
        /// Operation name (e.g. "move", "copy")
        operation: String,
        /// The resource the operation was applied to
        path: String,
        /// Why it was refused
        reason: String,
    },

    /// A node of the resource tree could not be traversed.
    #[error("cannot traverse {path}: {reason}")]
    TraversalFailed {
        /// The node whose children could not be listed
        path: String,
        /// Description of the failure
        reason: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Workspace manifest or script could not be read.
    #[error("manifest error: {0}")]
    ManifestError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AliasError {
    pub(crate) fn invalid_location(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_operation(
        operation: &str,
        path: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOperation {
            operation: operation.to_string(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidLocation { .. } => Some(
                "Locations must be absolute: a URI such as 'file:/data/dir' or a path such as '/data/dir'.",
            ),
            Self::InvalidResourcePath(_) => {
                Some("Resource paths start with '/' followed by the project name, e.g. '/Project/src'.")
            }
            Self::ProjectClosed(_) => Some("Open the project before modifying its resources."),
            Self::ParentMissing(_) => Some("Create the parent folder first."),
            Self::ConfigError(_) => Some("Check aliases.toml for syntax errors or remove it to use defaults."),
            Self::TraversalFailed { .. } => {
                Some("The resource was skipped; run 'aliases verify' to check the alias table.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for alias_core operations.
pub type Result<T> = std::result::Result<T, AliasError>;
