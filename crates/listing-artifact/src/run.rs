//! Run tracking: configuration and artifact lineage for one stage execution.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ArtifactError, Result};
use crate::interface::{ArtifactFetcher, ArtifactId, ArtifactPublisher, ArtifactSpec};
use crate::local::LocalArtifactStore;

const RUNS_DIR: &str = "runs";
const RUN_FILE: &str = "run.json";

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// Persisted description of a run (`run.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub job_type: String,
    pub status: RunStatus,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    pub config: serde_json::Value,
    #[serde(default)]
    pub used_artifacts: Vec<String>,
    #[serde(default)]
    pub logged_artifacts: Vec<String>,
}

/// A tracked execution of a pipeline stage.
///
/// Every fetch and publish made through the run is recorded in its
/// `run.json`, which is rewritten after each change.
#[derive(Debug)]
pub struct Run {
    store: LocalArtifactStore,
    record: RunRecord,
    record_path: PathBuf,
}

impl Run {
    /// Start a run of `job_type`, recording `config` for reproducibility.
    pub fn init(
        store: LocalArtifactStore,
        job_type: &str,
        config: serde_json::Value,
    ) -> Result<Self> {
        let runs_dir = store.root().join(RUNS_DIR);
        fs::create_dir_all(&runs_dir).map_err(|e| ArtifactError::io("create", &runs_dir, e))?;

        let base = format!(
            "{}-{}",
            Utc::now().format("%Y%m%dT%H%M%S%3fZ"),
            std::process::id()
        );
        let mut attempt = 0u32;
        let (id, dir) = loop {
            let id = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}-{attempt}")
            };
            let dir = runs_dir.join(&id);
            match fs::create_dir(&dir) {
                Ok(()) => break (id, dir),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(ArtifactError::io("create", &dir, e)),
            }
        };

        let run = Self {
            store,
            record: RunRecord {
                id,
                job_type: job_type.to_string(),
                status: RunStatus::Running,
                started_at: Utc::now().to_rfc3339(),
                finished_at: None,
                config,
                used_artifacts: Vec::new(),
                logged_artifacts: Vec::new(),
            },
            record_path: dir.join(RUN_FILE),
        };
        run.persist()?;
        info!(run_id = %run.record.id, job_type, "run started");
        Ok(run)
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    pub fn store(&self) -> &LocalArtifactStore {
        &self.store
    }

    /// Fetch an input artifact and record it as used by this run.
    pub fn use_artifact(&mut self, reference: &str) -> Result<PathBuf> {
        let (manifest, path) = self.store.locate(reference)?;
        let resolved = manifest.id().to_string();
        debug!(reference, resolved = %resolved, path = %path.display(), "using artifact");
        self.record.used_artifacts.push(resolved);
        self.persist()?;
        Ok(path)
    }

    /// Publish an output artifact attributed to this run.
    pub fn log_artifact(&mut self, file: &Path, spec: &ArtifactSpec) -> Result<ArtifactId> {
        let id = self.store.publish_with_run(file, spec, Some(&self.record.id))?;
        self.record.logged_artifacts.push(id.to_string());
        self.persist()?;
        Ok(id)
    }

    /// Mark the run as ended with `status` and return its final record.
    pub fn finish(mut self, status: RunStatus) -> Result<RunRecord> {
        self.record.status = status;
        self.record.finished_at = Some(Utc::now().to_rfc3339());
        self.persist()?;
        info!(run_id = %self.record.id, status = ?status, "run finished");
        Ok(self.record)
    }

    fn persist(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.record).map_err(|e| ArtifactError::Record {
            path: self.record_path.clone(),
            source: e,
        })?;
        fs::write(&self.record_path, bytes)
            .map_err(|e| ArtifactError::io("write", &self.record_path, e))
    }
}

impl ArtifactFetcher for Run {
    fn fetch(&mut self, reference: &str) -> Result<PathBuf> {
        self.use_artifact(reference)
    }
}

impl ArtifactPublisher for Run {
    fn publish(&mut self, file: &Path, spec: &ArtifactSpec) -> Result<ArtifactId> {
        self.log_artifact(file, spec)
    }
}
