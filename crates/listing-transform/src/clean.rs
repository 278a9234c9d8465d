//! The full listing cleaning transform.

use polars::prelude::DataFrame;
use tracing::info;

use crate::bounds::{GeoBounds, NYC_BOUNDS, PriceBounds};
use crate::columns::{LATITUDE, LONGITUDE, PRICE, missing_columns};
use crate::error::{Result, TransformError};
use crate::filter::{ensure_numeric, filter_geo, filter_price};
use crate::normalization::normalize_last_review;

/// Bounds applied by one cleaning pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleaningRules {
    pub price: PriceBounds,
    pub geo: GeoBounds,
}

impl CleaningRules {
    /// Rules for New York City listings with the given price range.
    pub fn nyc(price: PriceBounds) -> Self {
        Self {
            price,
            geo: NYC_BOUNDS,
        }
    }
}

/// Row counts observed while cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub rows_in: usize,
    pub dropped_by_price: usize,
    pub dropped_by_geo: usize,
    pub rows_out: usize,
}

/// A cleaned table together with its row counts.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub data: DataFrame,
    pub summary: CleanSummary,
}

/// Clean a listing table with the New York City geographic box.
pub fn clean_listings(df: &DataFrame, price: PriceBounds) -> Result<CleanedTable> {
    clean_listings_with(df, &CleaningRules::nyc(price))
}

/// Clean a listing table.
///
/// Steps, each producing a new DataFrame:
/// 1. verify `price`, `longitude`, `latitude` and `last_review` exist, and
///    that the first three are numeric
/// 2. normalize `last_review` (any unparsable value aborts)
/// 3. keep rows with price in range
/// 4. keep rows inside the geographic box
///
/// No filtering happens unless steps 1 and 2 succeed for the whole table.
pub fn clean_listings_with(df: &DataFrame, rules: &CleaningRules) -> Result<CleanedTable> {
    let missing = missing_columns(df);
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns { columns: missing });
    }
    for name in [PRICE, LONGITUDE, LATITUDE] {
        ensure_numeric(df, name)?;
    }

    let normalized = normalize_last_review(df)?;
    let priced = filter_price(&normalized, &rules.price)?;
    let located = filter_geo(&priced, &rules.geo)?;

    let summary = CleanSummary {
        rows_in: df.height(),
        dropped_by_price: normalized.height() - priced.height(),
        dropped_by_geo: priced.height() - located.height(),
        rows_out: located.height(),
    };
    info!(
        rows_in = summary.rows_in,
        dropped_by_price = summary.dropped_by_price,
        dropped_by_geo = summary.dropped_by_geo,
        rows_out = summary.rows_out,
        "cleaned listings"
    );

    Ok(CleanedTable {
        data: located,
        summary,
    })
}
