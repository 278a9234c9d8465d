//! `last_review` parsing and canonical formatting.
//!
//! Review dates arrive in whatever form the upstream export produced. They are
//! parsed into a `NaiveDateTime` and written back in one canonical form per
//! column: `YYYY-MM-DD` when every value falls on midnight, otherwise
//! `YYYY-MM-DD HH:MM:SS`. Empty cells stay null.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{DataFrame, DataType, IntoSeries, StringChunkedBuilder};
use tracing::debug;

use crate::columns::LAST_REVIEW;
use crate::error::{Result, TransformError};

/// Canonical format for columns holding dates only.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical format for columns holding at least one time of day.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a review date/time string.
///
/// Accepts ISO 8601 dates and date-times (`T` or space separated, optional
/// fractional seconds), RFC 3339 with an offset (converted to UTC),
/// `YYYY/MM/DD` and `MM/DD/YYYY`. Dates without a time map to midnight.
pub fn parse_review_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_INPUT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Rewrite `last_review` in canonical form, returning a new DataFrame.
///
/// Fails on the first value that cannot be parsed; no row is dropped or
/// repaired. Column order and every other column are untouched.
pub fn normalize_last_review(df: &DataFrame) -> Result<DataFrame> {
    let raw = df.column(LAST_REVIEW)?.cast(&DataType::String)?;
    let values = raw.str()?;

    let mut parsed: Vec<Option<NaiveDateTime>> = Vec::with_capacity(df.height());
    for (row, value) in values.into_iter().enumerate() {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            parsed.push(None);
            continue;
        };
        let timestamp =
            parse_review_timestamp(value).ok_or_else(|| TransformError::InvalidDate {
                column: LAST_REVIEW.to_string(),
                row,
                value: value.to_string(),
            })?;
        parsed.push(Some(timestamp));
    }

    let date_only = parsed
        .iter()
        .flatten()
        .all(|timestamp| timestamp.time() == NaiveTime::MIN);
    let format = if date_only { DATE_FORMAT } else { DATETIME_FORMAT };

    let mut builder = StringChunkedBuilder::new(LAST_REVIEW.into(), parsed.len());
    for timestamp in &parsed {
        match timestamp {
            Some(timestamp) => builder.append_value(timestamp.format(format).to_string()),
            None => builder.append_null(),
        }
    }

    let mut normalized = df.clone();
    normalized.with_column(builder.finish().into_series())?;
    debug!(
        rows = parsed.len(),
        missing = parsed.iter().filter(|ts| ts.is_none()).count(),
        format,
        "normalized last_review"
    );
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn review_frame(values: Vec<Option<&str>>) -> DataFrame {
        let n = values.len();
        let columns: Vec<Column> = vec![
            Series::new("id".into(), (0..n as i64).collect::<Vec<_>>()).into_column(),
            Series::new(LAST_REVIEW.into(), values).into_column(),
        ];
        DataFrame::new(columns).unwrap()
    }

    fn reviews(df: &DataFrame) -> Vec<Option<String>> {
        df.column(LAST_REVIEW)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_review_timestamp("2019-05-01"),
            Some(ts(2019, 5, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_datetime_variants() {
        let expected = Some(ts(2019, 5, 1, 14, 30, 0));
        assert_eq!(parse_review_timestamp("2019-05-01T14:30:00"), expected);
        assert_eq!(parse_review_timestamp("2019-05-01 14:30:00"), expected);
        assert_eq!(parse_review_timestamp("2019-05-01 14:30"), expected);
        assert_eq!(parse_review_timestamp("2019-05-01T14:30:00.000"), expected);
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        assert_eq!(
            parse_review_timestamp("2019-05-01T10:30:00-04:00"),
            Some(ts(2019, 5, 1, 14, 30, 0))
        );
    }

    #[test]
    fn test_parse_slash_formats() {
        assert_eq!(
            parse_review_timestamp("2019/05/01"),
            Some(ts(2019, 5, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_review_timestamp("05/01/2019"),
            Some(ts(2019, 5, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_review_timestamp(""), None);
        assert_eq!(parse_review_timestamp("not-a-date"), None);
        assert_eq!(parse_review_timestamp("2019-13-01"), None);
    }

    #[test]
    fn test_normalize_date_only_column() {
        let df = review_frame(vec![Some("2019/05/01"), None, Some(" 2018-10-19 ")]);
        let normalized = normalize_last_review(&df).unwrap();
        assert_eq!(
            reviews(&normalized),
            vec![
                Some("2019-05-01".to_string()),
                None,
                Some("2018-10-19".to_string())
            ]
        );
    }

    #[test]
    fn test_normalize_mixed_times_uses_datetime_format() {
        let df = review_frame(vec![Some("2019-05-01"), Some("2019-05-02T08:15:00")]);
        let normalized = normalize_last_review(&df).unwrap();
        assert_eq!(
            reviews(&normalized),
            vec![
                Some("2019-05-01 00:00:00".to_string()),
                Some("2019-05-02 08:15:00".to_string())
            ]
        );
    }

    #[test]
    fn test_normalize_empty_string_is_null() {
        let df = review_frame(vec![Some(""), Some("   ")]);
        let normalized = normalize_last_review(&df).unwrap();
        assert_eq!(reviews(&normalized), vec![None, None]);
    }

    #[test]
    fn test_normalize_rejects_unparsable_value() {
        let df = review_frame(vec![Some("2019-05-01"), Some("not-a-date")]);
        let err = normalize_last_review(&df).unwrap_err();
        match err {
            TransformError::InvalidDate { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_normalize_keeps_column_order() {
        let df = review_frame(vec![Some("2019-05-01")]);
        let normalized = normalize_last_review(&df).unwrap();
        assert_eq!(df.get_column_names(), normalized.get_column_names());
    }
}
