//! Integration tests for the basic cleaning pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use listing_artifact::{
    ArtifactError, ArtifactFetcher, ArtifactId, ArtifactPublisher, ArtifactSpec,
    LocalArtifactStore, RunRecord, RunStatus,
};
use listing_cli::pipeline::{CleaningJob, run_basic_cleaning, run_tracked};
use listing_cli::staging::CleanupPolicy;
use listing_transform::{PriceBounds, TransformError};

const HEADER: &str = "id,name,price,longitude,latitude,last_review";

fn raw_csv(rows: &[&str]) -> String {
    let mut content = format!("{HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content
}

fn job() -> CleaningJob {
    CleaningJob {
        input_artifact: "sample.csv:latest".to_string(),
        output: ArtifactSpec::new(
            "clean_sample.csv",
            "clean_sample",
            "Data with outliers and null values removed",
        ),
        price: PriceBounds::new(10.0, 100.0),
    }
}

fn seeded_store(root: &Path, content: &str) -> LocalArtifactStore {
    let scratch = tempfile::tempdir().unwrap();
    let raw = scratch.path().join("sample.csv");
    fs::write(&raw, content).unwrap();
    let mut store = LocalArtifactStore::open(root).unwrap();
    store
        .publish(&raw, &ArtifactSpec::new("sample.csv", "raw_data", "Raw export"))
        .unwrap();
    store
}

fn single_run_record(root: &Path) -> RunRecord {
    let runs: Vec<PathBuf> = fs::read_dir(root.join("runs"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(runs.len(), 1);
    let content = fs::read_to_string(runs[0].join("run.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Serves one local file and records every publish call.
struct RecordingTracker {
    input: PathBuf,
    fail_publish: bool,
    published: Vec<(PathBuf, String, bool)>,
}

impl RecordingTracker {
    fn new(input: PathBuf) -> Self {
        Self {
            input,
            fail_publish: false,
            published: Vec::new(),
        }
    }
}

impl ArtifactFetcher for RecordingTracker {
    fn fetch(&mut self, _reference: &str) -> listing_artifact::Result<PathBuf> {
        Ok(self.input.clone())
    }
}

impl ArtifactPublisher for RecordingTracker {
    fn publish(
        &mut self,
        file: &Path,
        spec: &ArtifactSpec,
    ) -> listing_artifact::Result<ArtifactId> {
        let content = fs::read_to_string(file).unwrap_or_default();
        self.published
            .push((file.to_path_buf(), content, file.is_file()));
        if self.fail_publish {
            return Err(ArtifactError::Io {
                operation: "upload",
                path: file.to_path_buf(),
                source: std::io::Error::other("quota exceeded"),
            });
        }
        Ok(ArtifactId {
            name: spec.name.clone(),
            version: 0,
            digest: String::new(),
        })
    }
}

#[test]
fn publishes_only_rows_within_bounds() {
    let root = tempfile::tempdir().unwrap();
    let mut store = seeded_store(
        root.path(),
        &raw_csv(&[
            "1,Kept,50,-73.9,40.7,2019-05-01",
            "2,Too cheap,5,-73.9,40.7,2019-05-01",
            "3,Out east,50,-70.0,40.7,2019-05-01",
        ]),
    );

    let outcome = run_basic_cleaning(&mut store, &job(), CleanupPolicy::Always).unwrap();

    assert_eq!(outcome.artifact.to_string(), "clean_sample.csv:v0");
    assert_eq!(outcome.summary.rows_in, 3);
    assert_eq!(outcome.summary.dropped_by_price, 1);
    assert_eq!(outcome.summary.dropped_by_geo, 1);
    assert_eq!(outcome.summary.rows_out, 1);

    let published = store.fetch("clean_sample.csv:latest").unwrap();
    let content = fs::read_to_string(published).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].starts_with("1,Kept,50,"));
    assert!(lines[1].ends_with(",2019-05-01"));

    let manifest = store.manifest("clean_sample.csv", 0).unwrap();
    assert_eq!(manifest.artifact_type, "clean_sample");
    assert_eq!(manifest.file_name, "clean_sample.csv");
}

#[test]
fn empty_table_is_still_published() {
    let input_dir = tempfile::tempdir().unwrap();
    let input = input_dir.path().join("sample.csv");
    fs::write(&input, raw_csv(&[])).unwrap();
    let mut tracker = RecordingTracker::new(input);

    let outcome = run_basic_cleaning(&mut tracker, &job(), CleanupPolicy::Always).unwrap();

    assert_eq!(outcome.summary.rows_out, 0);
    assert_eq!(tracker.published.len(), 1);
    let (path, content, existed) = &tracker.published[0];
    assert!(*existed);
    assert_eq!(content.trim_end(), HEADER);
    assert_eq!(path.file_name().unwrap(), "clean_sample.csv");
    assert!(!path.exists());
}

#[test]
fn unparsable_review_date_publishes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let mut store = seeded_store(
        root.path(),
        &raw_csv(&[
            "1,Kept,50,-73.9,40.7,2019-05-01",
            "2,Broken,50,-73.9,40.7,not-a-date",
        ]),
    );

    let error = run_basic_cleaning(&mut store, &job(), CleanupPolicy::Always).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<TransformError>(),
        Some(TransformError::InvalidDate { .. })
    ));
    assert!(store.versions("clean_sample.csv").unwrap().is_empty());
}

#[test]
fn missing_column_is_a_schema_error() {
    let input_dir = tempfile::tempdir().unwrap();
    let input = input_dir.path().join("sample.csv");
    fs::write(&input, "id,price,last_review\n1,50,2019-05-01\n").unwrap();
    let mut tracker = RecordingTracker::new(input);

    let error = run_basic_cleaning(&mut tracker, &job(), CleanupPolicy::Always).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<TransformError>(),
        Some(TransformError::MissingColumns { .. })
    ));
    assert!(tracker.published.is_empty());
}

#[test]
fn currency_formatted_prices_abort_the_run() {
    let input_dir = tempfile::tempdir().unwrap();
    let input = input_dir.path().join("sample.csv");
    fs::write(
        &input,
        raw_csv(&[
            "1,Dollar,$50,-73.9,40.7,2019-05-01",
            "2,Plain,50,-73.9,40.7,2019-05-01",
        ]),
    )
    .unwrap();
    let mut tracker = RecordingTracker::new(input);

    let error = run_basic_cleaning(&mut tracker, &job(), CleanupPolicy::Always).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<TransformError>(),
        Some(TransformError::NonNumericColumn { column, .. }) if column == "price"
    ));
    assert!(tracker.published.is_empty());
}

#[test]
fn unknown_input_artifact_is_a_resolution_error() {
    let root = tempfile::tempdir().unwrap();
    let mut store = LocalArtifactStore::open(root.path()).unwrap();

    let error = run_basic_cleaning(&mut store, &job(), CleanupPolicy::Always).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<ArtifactError>(),
        Some(ArtifactError::NotFound { .. })
    ));
}

#[test]
fn failed_publish_removes_staged_file_by_default() {
    let input_dir = tempfile::tempdir().unwrap();
    let input = input_dir.path().join("sample.csv");
    fs::write(&input, raw_csv(&["1,Kept,50,-73.9,40.7,2019-05-01"])).unwrap();
    let mut tracker = RecordingTracker::new(input);
    tracker.fail_publish = true;

    let error = run_basic_cleaning(&mut tracker, &job(), CleanupPolicy::Always).unwrap_err();

    assert!(error.downcast_ref::<ArtifactError>().is_some());
    let (path, _, existed) = &tracker.published[0];
    assert!(*existed);
    assert!(!path.exists());
}

#[test]
fn failed_publish_keeps_staged_file_when_requested() {
    let input_dir = tempfile::tempdir().unwrap();
    let input = input_dir.path().join("sample.csv");
    fs::write(&input, raw_csv(&["1,Kept,50,-73.9,40.7,2019-05-01"])).unwrap();
    let mut tracker = RecordingTracker::new(input);
    tracker.fail_publish = true;

    run_basic_cleaning(&mut tracker, &job(), CleanupPolicy::KeepOnFailure).unwrap_err();

    let (path, content, _) = &tracker.published[0];
    assert!(path.exists());
    assert_eq!(&fs::read_to_string(path).unwrap(), content);
    fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn tracked_run_records_lineage() {
    let root = tempfile::tempdir().unwrap();
    let store = seeded_store(
        root.path(),
        &raw_csv(&["1,Kept,50,-73.9,40.7,2019-05-01"]),
    );
    let job = job();

    let outcome = run_tracked(store, &job, CleanupPolicy::Always).unwrap();
    let record = single_run_record(root.path());

    assert_eq!(record.job_type, "basic_cleaning");
    assert_eq!(record.status, RunStatus::Finished);
    assert_eq!(record.config["min_price"], 10.0);
    assert_eq!(record.config["output_artifact"], "clean_sample.csv");
    assert_eq!(record.used_artifacts, vec!["sample.csv:v0"]);
    assert_eq!(record.logged_artifacts, vec![outcome.artifact.to_string()]);
}

#[test]
fn failed_tracked_run_is_recorded_as_failed() {
    let root = tempfile::tempdir().unwrap();
    let store = seeded_store(
        root.path(),
        &raw_csv(&["1,Broken,50,-73.9,40.7,not-a-date"]),
    );

    let result = run_tracked(store, &job(), CleanupPolicy::Always);

    assert!(result.is_err());
    let record = single_run_record(root.path());
    assert_eq!(record.status, RunStatus::Failed);
    assert!(record.finished_at.is_some());
    assert_eq!(record.used_artifacts, vec!["sample.csv:v0"]);
    assert!(record.logged_artifacts.is_empty());

    let store = LocalArtifactStore::open(root.path()).unwrap();
    assert!(store.versions("clean_sample.csv").unwrap().is_empty());
}
