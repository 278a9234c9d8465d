//! CSV file reading into Polars DataFrames.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open_file(path)?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads the column names from the first line of a CSV file.
///
/// A UTF-8 BOM is stripped. Returns [`IngestError::EmptyCsv`] when the file
/// has no header line.
pub fn read_csv_header(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(open_file(path)?);
    let Some(line) = reader.lines().next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let line = line.map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let line = line.strip_prefix('\u{feff}').unwrap_or(&line);
    if line.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(split_header_line(line))
}

/// Splits a header line into fields, honoring double-quoted names.
fn split_header_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => in_quotes = true,
            '"' => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Returns true when any non-blank line follows the header line.
fn has_data_rows(path: &Path) -> Result<bool> {
    let reader = BufReader::new(open_file(path)?);
    for line in reader.lines().skip(1) {
        let line = line.map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        if !line.trim().is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Reads a listing CSV file (single header row) into a Polars DataFrame.
///
/// The whole file is scanned for schema inference so that a column holding
/// both integers and decimals is typed as floating point. A header-only file
/// yields an empty DataFrame with the header's columns typed as strings.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;
    let header = read_csv_header(path)?;

    if !has_data_rows(path)? {
        debug!(path = %path.display(), columns = header.len(), "header-only CSV");
        return empty_table(&header).map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded CSV table"
    );
    Ok(df)
}

fn empty_table(columns: &[String]) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = columns
        .iter()
        .map(|name| Series::new_empty(name.as_str().into(), &DataType::String).into_column())
        .collect();
    DataFrame::new(columns)
}
