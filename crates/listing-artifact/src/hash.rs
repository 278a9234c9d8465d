//! Content digests for artifact files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{ArtifactError, Result};

/// Compute the hex-encoded SHA-256 digest of a file.
pub fn compute_file_digest(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| ArtifactError::io("read", path, e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| ArtifactError::io("read", path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
