//! Column names the cleaning rules read.

use polars::prelude::DataFrame;

pub const PRICE: &str = "price";
pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";
pub const LAST_REVIEW: &str = "last_review";

/// Columns that must be present before any cleaning rule runs.
pub const REQUIRED_COLUMNS: [&str; 4] = [PRICE, LONGITUDE, LATITUDE, LAST_REVIEW];

/// Returns the required columns absent from `df`, in declaration order.
pub fn missing_columns(df: &DataFrame) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|name| df.get_column_index(name).is_none())
        .map(|name| (*name).to_string())
        .collect()
}
