//! Per-version artifact manifest (`manifest.json`).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, Result};
use crate::interface::ArtifactId;

pub(crate) const MANIFEST_FILE: &str = "manifest.json";

/// Metadata stored alongside every artifact version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub description: String,
    pub file_name: String,
    pub digest: String,
    pub size: u64,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl ArtifactManifest {
    pub fn id(&self) -> ArtifactId {
        ArtifactId {
            name: self.name.clone(),
            version: self.version,
            digest: self.digest.clone(),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| ArtifactError::io("read", path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Record {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self).map_err(|e| ArtifactError::Record {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, bytes).map_err(|e| ArtifactError::io("write", path, e))
    }
}
