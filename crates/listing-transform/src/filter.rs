//! Stable row filters on price and coordinates.
//!
//! Each filter builds a boolean keep-mask and returns a new DataFrame holding
//! the retained rows in their original order. Null cells never satisfy a
//! predicate, so such rows are dropped. A column holding non-numeric values is
//! an error.

use polars::prelude::{BooleanChunked, Column, DataFrame, DataType, NewChunkedArray};
use tracing::debug;

use crate::bounds::{GeoBounds, PriceBounds};
use crate::columns::{LATITUDE, LONGITUDE, PRICE};
use crate::error::{Result, TransformError};

/// Verify that `name` is numeric.
///
/// Columns with no values at all (empty or entirely null tables) are read as
/// text and are accepted.
pub fn ensure_numeric(df: &DataFrame, name: &str) -> Result<()> {
    let column = df
        .column(name)
        .map_err(|_| TransformError::MissingColumns {
            columns: vec![name.to_string()],
        })?;
    let dtype = column.dtype();
    if dtype.is_numeric() || column.null_count() == column.len() {
        return Ok(());
    }
    Err(TransformError::NonNumericColumn {
        column: name.to_string(),
        dtype: dtype.to_string(),
    })
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Column> {
    ensure_numeric(df, name)?;
    let column = df.column(name)?;
    Ok(column.cast(&DataType::Float64)?)
}

fn apply_mask(df: &DataFrame, keep: &[bool], name: &str) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice(name.into(), keep);
    Ok(df.filter(&mask)?)
}

/// Keep rows whose `price` lies within `bounds` (inclusive).
pub fn filter_price(df: &DataFrame, bounds: &PriceBounds) -> Result<DataFrame> {
    let prices = numeric_column(df, PRICE)?;
    let keep: Vec<bool> = prices
        .f64()?
        .into_iter()
        .map(|price| price.is_some_and(|p| bounds.contains(p)))
        .collect();
    let filtered = apply_mask(df, &keep, "price_in_range")?;
    debug!(
        min = bounds.min,
        max = bounds.max,
        kept = filtered.height(),
        dropped = df.height() - filtered.height(),
        "price filter"
    );
    Ok(filtered)
}

/// Keep rows whose (`longitude`, `latitude`) lies inside `bounds` (inclusive).
pub fn filter_geo(df: &DataFrame, bounds: &GeoBounds) -> Result<DataFrame> {
    let longitudes = numeric_column(df, LONGITUDE)?;
    let latitudes = numeric_column(df, LATITUDE)?;
    let keep: Vec<bool> = longitudes
        .f64()?
        .into_iter()
        .zip(latitudes.f64()?.into_iter())
        .map(|(lon, lat)| match (lon, lat) {
            (Some(lon), Some(lat)) => bounds.contains(lon, lat),
            _ => false,
        })
        .collect();
    let filtered = apply_mask(df, &keep, "in_geo_bounds")?;
    debug!(
        kept = filtered.height(),
        dropped = df.height() - filtered.height(),
        "geo filter"
    );
    Ok(filtered)
}
