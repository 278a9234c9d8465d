//! Column normalization applied before filtering.

pub mod datetime;

pub use datetime::{DATE_FORMAT, DATETIME_FORMAT, normalize_last_review, parse_review_timestamp};
