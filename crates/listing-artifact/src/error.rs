//! Artifact store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Artifact store operation error.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No artifact with this name exists.
    #[error("artifact not found: {reference}")]
    NotFound { reference: String },

    /// The artifact exists but not at the requested version.
    #[error("artifact {name} has no version v{version}")]
    VersionNotFound { name: String, version: u32 },

    /// The reference string is malformed.
    #[error("invalid artifact reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// The artifact name cannot be used as a directory name.
    #[error("invalid artifact name '{name}'")]
    InvalidName { name: String },

    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest or run record could not be read or written.
    #[error("invalid record {path}")]
    Record {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ArtifactError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result type for artifact operations.
pub type Result<T> = std::result::Result<T, ArtifactError>;
