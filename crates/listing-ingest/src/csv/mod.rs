//! CSV reading and writing.

mod reader;
mod writer;

pub use reader::{read_csv_header, read_csv_table, validate_encoding};
pub use writer::write_csv_table;
