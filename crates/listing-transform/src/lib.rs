//! Listing cleaning transform.
//!
//! This crate holds the row-level cleaning rules applied to a listing table:
//!
//! - **normalization**: `last_review` parsing and canonical formatting
//! - **bounds**: inclusive price range and geographic box
//! - **filter**: stable row filters on price and coordinates
//! - **clean**: the full transform (schema check, normalization, filters)
//!
//! Every operation takes a DataFrame by reference and returns a new one.

pub mod bounds;
pub mod clean;
pub mod columns;
mod error;
pub mod filter;
pub mod normalization;

pub use bounds::{GeoBounds, NYC_BOUNDS, PriceBounds};
pub use clean::{CleanSummary, CleanedTable, CleaningRules, clean_listings, clean_listings_with};
pub use error::{Result, TransformError};
pub use filter::{ensure_numeric, filter_geo, filter_price};
pub use normalization::{normalize_last_review, parse_review_timestamp};
