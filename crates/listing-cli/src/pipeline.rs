//! Orchestration of one basic cleaning run.
//!
//! fetch → load → clean → serialize → publish → release. The first failing
//! stage aborts the run; nothing is published unless every earlier stage
//! succeeded.

use std::time::Instant;

use anyhow::{Context, Result};
use listing_artifact::{
    ArtifactFetcher, ArtifactId, ArtifactPublisher, ArtifactSpec, LocalArtifactStore, Run,
    RunStatus,
};
use listing_ingest::{read_csv_table, write_csv_table};
use listing_transform::{CleanSummary, PriceBounds, clean_listings};
use serde_json::json;
use tracing::{debug, info, info_span, warn};

use crate::staging::{CleanupPolicy, StagedOutput};

/// Job type recorded for runs of this stage.
pub const JOB_TYPE: &str = "basic_cleaning";

/// Parameters of one cleaning run.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningJob {
    pub input_artifact: String,
    pub output: ArtifactSpec,
    pub price: PriceBounds,
}

impl CleaningJob {
    /// Configuration recorded in the run context.
    pub fn config(&self) -> serde_json::Value {
        json!({
            "input_artifact": self.input_artifact,
            "output_artifact": self.output.name,
            "output_type": self.output.artifact_type,
            "output_description": self.output.description,
            "min_price": self.price.min,
            "max_price": self.price.max,
        })
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub input_artifact: String,
    pub artifact: ArtifactId,
    pub summary: CleanSummary,
}

/// Run the cleaning stage against `tracker`.
///
/// `tracker` resolves the input artifact and receives exactly one publish
/// call, made after the cleaned table is fully written. The staged file is
/// removed once publish returns; on failure `cleanup` decides whether it is
/// kept for inspection.
pub fn run_basic_cleaning<T>(
    tracker: &mut T,
    job: &CleaningJob,
    cleanup: CleanupPolicy,
) -> Result<CleaningOutcome>
where
    T: ArtifactFetcher + ArtifactPublisher,
{
    let span = info_span!(
        "basic_cleaning",
        input = %job.input_artifact,
        output = %job.output.name
    );
    let _guard = span.enter();
    let started = Instant::now();

    info!("Download input artifact");
    let input_path = tracker
        .fetch(&job.input_artifact)
        .with_context(|| format!("fetch input artifact {}", job.input_artifact))?;
    debug!(path = %input_path.display(), "input artifact resolved");

    info!("Loading artifact to dataframe");
    let raw = read_csv_table(&input_path)
        .with_context(|| format!("load {}", input_path.display()))?;

    info!("Cleaning the data");
    let cleaned = clean_listings(&raw, job.price).context("clean listings")?;
    let summary = cleaned.summary;
    let mut data = cleaned.data;

    let staged = StagedOutput::create(&job.output.name, cleanup)
        .with_context(|| format!("stage output {}", job.output.name))?;
    write_csv_table(&mut data, staged.path()).context("serialize cleaned table")?;

    info!("Creating artifact");
    let artifact = tracker
        .publish(staged.path(), &job.output)
        .with_context(|| format!("publish artifact {}", job.output.name))?;

    staged.release().context("remove staged output")?;
    info!(
        artifact = %artifact,
        rows = summary.rows_out,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Cleaned data artifact logged"
    );

    Ok(CleaningOutcome {
        input_artifact: job.input_artifact.clone(),
        artifact,
        summary,
    })
}

/// Run the cleaning stage as a tracked run in `store`.
///
/// The run records the job configuration on start and is finished as
/// `finished` or `failed` depending on the outcome. A failure to record the
/// failed status is logged and the original error is returned.
pub fn run_tracked(
    store: LocalArtifactStore,
    job: &CleaningJob,
    cleanup: CleanupPolicy,
) -> Result<CleaningOutcome> {
    let mut run = Run::init(store, JOB_TYPE, job.config()).context("start run")?;
    debug!(run = run.id(), "run started");

    match run_basic_cleaning(&mut run, job, cleanup) {
        Ok(outcome) => {
            run.finish(RunStatus::Finished).context("finish run")?;
            Ok(outcome)
        }
        Err(error) => {
            if let Err(finish_error) = run.finish(RunStatus::Failed) {
                warn!(%finish_error, "failed to record run failure");
            }
            Err(error)
        }
    }
}
