//! Listing data ingestion utilities.
//!
//! This crate loads listing tables from delimited files into Polars
//! DataFrames and serializes cleaned tables back to the same format.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use listing_ingest::{read_csv_table, write_csv_table};
//!
//! let mut df = read_csv_table(Path::new("sample.csv"))?;
//! write_csv_table(&mut df, Path::new("clean_sample.csv"))?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading / Writing ===
pub use csv::{read_csv_header, read_csv_table, validate_encoding, write_csv_table};
