//! CSV serialization of DataFrames.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Writes a DataFrame as a comma-delimited file with a header row.
///
/// Null cells are written as empty fields. The file is created or truncated
/// and fully flushed before this returns.
pub fn write_csv_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    CsvWriter::new(&mut writer)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    writer.flush().map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), rows = df.height(), "wrote CSV table");
    Ok(())
}
