//! Interfaces a pipeline stage consumes to read and write artifacts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Resolves an artifact reference to a readable local file.
pub trait ArtifactFetcher {
    fn fetch(&mut self, reference: &str) -> Result<PathBuf>;
}

/// Registers a local file as a new artifact version.
///
/// Implementations must have fully read or copied `file` before returning;
/// the caller may delete it immediately afterwards.
pub trait ArtifactPublisher {
    fn publish(&mut self, file: &Path, spec: &ArtifactSpec) -> Result<ArtifactId>;
}

/// Metadata supplied when publishing an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub description: String,
}

impl ArtifactSpec {
    pub fn new(
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            description: description.into(),
        }
    }
}

/// Identifier of a published artifact version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactId {
    pub name: String,
    pub version: u32,
    pub digest: String,
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:v{}", self.name, self.version)
    }
}
