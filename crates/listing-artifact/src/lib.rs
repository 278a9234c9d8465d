//! Artifact tracking for pipeline stages.
//!
//! A pipeline stage consumes artifacts through two narrow interfaces:
//! [`ArtifactFetcher`] resolves a reference such as `sample.csv:latest` to a
//! local file, and [`ArtifactPublisher`] registers a local file as a new
//! artifact version. [`LocalArtifactStore`] implements both on a directory
//! tree; [`Run`] wraps a store and records configuration and lineage for one
//! execution of a stage.
//!
//! # Layout
//!
//! ```text
//! <root>/artifacts/<name>/v<N>/<file>
//! <root>/artifacts/<name>/v<N>/manifest.json
//! <root>/runs/<run_id>/run.json
//! ```

mod error;
mod hash;
mod interface;
mod local;
mod manifest;
mod reference;
mod run;

pub use error::{ArtifactError, Result};
pub use hash::compute_file_digest;
pub use interface::{ArtifactFetcher, ArtifactId, ArtifactPublisher, ArtifactSpec};
pub use local::LocalArtifactStore;
pub use manifest::ArtifactManifest;
pub use reference::{ArtifactReference, ArtifactVersion};
pub use run::{Run, RunRecord, RunStatus};
