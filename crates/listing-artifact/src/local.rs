//! Filesystem-backed artifact store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{ArtifactError, Result};
use crate::hash::compute_file_digest;
use crate::interface::{ArtifactFetcher, ArtifactId, ArtifactPublisher, ArtifactSpec};
use crate::manifest::{ArtifactManifest, MANIFEST_FILE};
use crate::reference::{ArtifactReference, ArtifactVersion, validate_name};

const ARTIFACTS_DIR: &str = "artifacts";

/// Versioned artifact store rooted at a local directory.
///
/// Versions are numbered from `v0`. A version is visible only once its
/// manifest has been written, so an interrupted publish never resolves.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let artifacts = root.join(ARTIFACTS_DIR);
        fs::create_dir_all(&artifacts).map_err(|e| ArtifactError::io("create", &artifacts, e))?;
        debug!(root = %root.display(), "opened artifact store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.root.join(ARTIFACTS_DIR).join(name)
    }

    fn version_dir(&self, name: &str, version: u32) -> PathBuf {
        self.artifact_dir(name).join(format!("v{version}"))
    }

    /// List the published versions of `name` in ascending order.
    pub fn versions(&self, name: &str) -> Result<Vec<u32>> {
        validate_name(name)?;
        let dir = self.artifact_dir(name);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| ArtifactError::io("read", &dir, e))?;
        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ArtifactError::io("read", &dir, e))?;
            let file_name = entry.file_name();
            let Some(version) = file_name
                .to_str()
                .and_then(|s| s.strip_prefix('v'))
                .and_then(|digits| digits.parse::<u32>().ok())
            else {
                continue;
            };
            if entry.path().join(MANIFEST_FILE).is_file() {
                versions.push(version);
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }

    /// Load the manifest of one artifact version.
    pub fn manifest(&self, name: &str, version: u32) -> Result<ArtifactManifest> {
        validate_name(name)?;
        let path = self.version_dir(name, version).join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ArtifactError::VersionNotFound {
                name: name.to_string(),
                version,
            });
        }
        ArtifactManifest::load(&path)
    }

    /// Resolve a reference to the manifest of the version it points at.
    pub fn resolve(&self, reference: &ArtifactReference) -> Result<ArtifactManifest> {
        let versions = self.versions(&reference.name)?;
        let Some(&latest) = versions.last() else {
            return Err(ArtifactError::NotFound {
                reference: reference.to_string(),
            });
        };
        let version = match reference.version {
            ArtifactVersion::Latest => latest,
            ArtifactVersion::Number(n) if versions.contains(&n) => n,
            ArtifactVersion::Number(n) => {
                return Err(ArtifactError::VersionNotFound {
                    name: reference.name.clone(),
                    version: n,
                });
            }
        };
        self.manifest(&reference.name, version)
    }

    /// Resolve a reference string to its manifest and the path of its file.
    pub fn locate(&self, reference: &str) -> Result<(ArtifactManifest, PathBuf)> {
        let reference: ArtifactReference = reference.parse()?;
        let manifest = self.resolve(&reference)?;
        let path = self
            .version_dir(&manifest.name, manifest.version)
            .join(&manifest.file_name);
        if !path.is_file() {
            return Err(ArtifactError::io(
                "access",
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "artifact file missing"),
            ));
        }
        Ok((manifest, path))
    }

    /// Publish `file` under `spec`, attributing it to `run_id` when given.
    ///
    /// When the file's digest matches the latest version of the artifact, no
    /// new version is written and the latest identifier is returned.
    pub fn publish_with_run(
        &mut self,
        file: &Path,
        spec: &ArtifactSpec,
        run_id: Option<&str>,
    ) -> Result<ArtifactId> {
        validate_name(&spec.name)?;
        let digest = compute_file_digest(file)?;
        let size = fs::metadata(file)
            .map_err(|e| ArtifactError::io("read", file, e))?
            .len();

        let versions = self.versions(&spec.name)?;
        if let Some(&latest) = versions.last() {
            let current = self.manifest(&spec.name, latest)?;
            if current.digest == digest {
                info!(artifact = %current.id(), "content unchanged, reusing latest version");
                return Ok(current.id());
            }
        }
        let version = versions.last().map_or(0, |latest| latest + 1);

        let dir = self.version_dir(&spec.name, version);
        fs::create_dir_all(&dir).map_err(|e| ArtifactError::io("create", &dir, e))?;

        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(spec.name.as_str())
            .to_string();
        let target = dir.join(&file_name);
        fs::copy(file, &target).map_err(|e| ArtifactError::io("copy", &target, e))?;

        let manifest = ArtifactManifest {
            name: spec.name.clone(),
            version,
            artifact_type: spec.artifact_type.clone(),
            description: spec.description.clone(),
            file_name,
            digest,
            size,
            created_at: Utc::now().to_rfc3339(),
            run_id: run_id.map(str::to_string),
        };
        manifest.save(&dir.join(MANIFEST_FILE))?;

        let id = manifest.id();
        info!(artifact = %id, artifact_type = %spec.artifact_type, size, "published artifact");
        Ok(id)
    }
}

impl ArtifactFetcher for LocalArtifactStore {
    fn fetch(&mut self, reference: &str) -> Result<PathBuf> {
        self.locate(reference).map(|(_, path)| path)
    }
}

impl ArtifactPublisher for LocalArtifactStore {
    fn publish(&mut self, file: &Path, spec: &ArtifactSpec) -> Result<ArtifactId> {
        self.publish_with_run(file, spec, None)
    }
}
