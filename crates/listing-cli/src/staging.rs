//! Scoped local staging of the serialized output table.
//!
//! The cleaned table is written to a file named after the output artifact
//! inside a private temporary directory. The directory is removed when the
//! [`StagedOutput`] is released or dropped, unless the run failed and the
//! policy asks to keep it.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

/// What happens to the staged file when a run does not complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Remove the staging directory on every exit path.
    #[default]
    Always,
    /// Keep the staging directory when the run fails.
    KeepOnFailure,
}

/// A staged output file owned by one run.
#[derive(Debug)]
pub struct StagedOutput {
    dir: Option<TempDir>,
    path: PathBuf,
    policy: CleanupPolicy,
}

impl StagedOutput {
    /// Create a staging directory holding (not yet written) `file_name`.
    ///
    /// `file_name` must be a single path component.
    pub fn create(file_name: &str, policy: CleanupPolicy) -> io::Result<Self> {
        let single_component = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !single_component {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output file name '{file_name}' must be a plain file name"),
            ));
        }

        let dir = tempfile::Builder::new()
            .prefix("basic-cleaning-")
            .tempdir()?;
        let path = dir.path().join(file_name);
        debug!(path = %path.display(), "staging output");
        Ok(Self {
            dir: Some(dir),
            path,
            policy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file and its directory after a successful publish.
    pub fn release(mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match self.policy {
            CleanupPolicy::Always => {
                if let Err(error) = dir.close() {
                    warn!(path = %self.path.display(), %error, "failed to remove staged output");
                }
            }
            CleanupPolicy::KeepOnFailure => {
                let kept = dir.keep();
                warn!(path = %kept.display(), "run did not complete; keeping staged output");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn release_removes_staged_file() {
        let staged = StagedOutput::create("clean_sample.csv", CleanupPolicy::Always).unwrap();
        fs::write(staged.path(), "id\n").unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(path.file_name().unwrap(), "clean_sample.csv");

        staged.release().unwrap();

        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn drop_removes_staged_file_by_default() {
        let staged = StagedOutput::create("out.csv", CleanupPolicy::Always).unwrap();
        fs::write(staged.path(), "id\n").unwrap();
        let path = staged.path().to_path_buf();

        drop(staged);

        assert!(!path.exists());
    }

    #[test]
    fn drop_keeps_staged_file_when_requested() {
        let staged = StagedOutput::create("out.csv", CleanupPolicy::KeepOnFailure).unwrap();
        fs::write(staged.path(), "id\n").unwrap();
        let path = staged.path().to_path_buf();

        drop(staged);

        assert!(path.exists());
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn release_ignores_keep_policy() {
        let staged = StagedOutput::create("out.csv", CleanupPolicy::KeepOnFailure).unwrap();
        fs::write(staged.path(), "id\n").unwrap();
        let path = staged.path().to_path_buf();

        staged.release().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn rejects_nested_file_names() {
        let result = StagedOutput::create("../escape.csv", CleanupPolicy::Always);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }
}
