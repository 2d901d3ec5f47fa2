//! Column type inference.
//!
//! Two questions are answered here:
//!
//! 1. What is a column right now? ([`column_type`], from its dtype)
//! 2. What could a text column become? ([`infer_target_format`], from how
//!    many of its values parse as dates or numbers)
//!
//! Column names act as hints for the second question: a column called
//! `created_at` needs fewer parseable values to become a datetime than one
//! called `notes`.

use polars::prelude::{Column, DataFrame, DataType, StringChunked};
use scrub_model::ColumnType;

use crate::error::Result;
use crate::normalization::datetime::parse_datetime;
use crate::normalization::numeric::parse_numeric;

/// Name fragments that hint at a datetime column.
pub const DATETIME_KEYWORDS: &[&str] = &[
    "date",
    "time",
    "timestamp",
    "created",
    "modified",
    "updated",
];

/// Name fragments that hint at a numeric column.
pub const NUMERIC_KEYWORDS: &[&str] = &[
    "price", "amount", "total", "cost", "score", "rate", "balance", "qty", "quantity",
];

/// Classify a column from its current dtype.
pub fn column_type(column: &Column) -> Option<ColumnType> {
    ColumnType::from_dtype(column.dtype())
}

/// Names of the columns currently classified as `ty`, in table order.
pub fn columns_of_type(df: &DataFrame, ty: ColumnType) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|column| column_type(column) == Some(ty))
        .map(|column| column.name().to_string())
        .collect()
}

/// Values of a text or categorical column as strings.
pub fn text_values(column: &Column) -> Result<StringChunked> {
    let ca = match column.dtype() {
        DataType::String => column.str()?.clone(),
        _ => column.cast(&DataType::String)?.str()?.clone(),
    };
    Ok(ca)
}

/// True when the column name suggests dates or times.
///
/// `dt` only counts as a whole `_`-separated token, so `width` is not a hint.
pub fn has_datetime_hint(name: &str) -> bool {
    let lower = name.to_lowercase();
    DATETIME_KEYWORDS.iter().any(|k| lower.contains(k))
        || lower.split(|c: char| !c.is_ascii_alphanumeric()).any(|t| t == "dt")
}

/// True when the column name suggests quantities or money.
pub fn has_numeric_hint(name: &str) -> bool {
    let lower = name.to_lowercase();
    NUMERIC_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Share of non-missing values that parse as each target type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseRates {
    pub non_missing: usize,
    pub datetime: f64,
    pub numeric: f64,
}

/// Measure parse rates over the non-missing, non-blank values.
pub fn measure_parse_rates(values: &StringChunked) -> ParseRates {
    let mut non_missing = 0usize;
    let mut datetime_hits = 0usize;
    let mut numeric_hits = 0usize;
    for value in values.into_iter().flatten() {
        if value.trim().is_empty() {
            continue;
        }
        non_missing += 1;
        if parse_datetime(value).is_some() {
            datetime_hits += 1;
        }
        if parse_numeric(value).is_some() {
            numeric_hits += 1;
        }
    }
    if non_missing == 0 {
        return ParseRates {
            non_missing,
            datetime: 0.0,
            numeric: 0.0,
        };
    }
    let total = non_missing as f64;
    ParseRates {
        non_missing,
        datetime: datetime_hits as f64 / total,
        numeric: numeric_hits as f64 / total,
    }
}

/// Type a text column can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Datetime,
    Numeric,
}

/// Minimum parse rates for conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseThresholds {
    /// Rate required without a name hint.
    pub strict: f64,
    /// Rate required when the name hints at the target type.
    pub hinted: f64,
}

impl ParseThresholds {
    fn for_hint(&self, hinted: bool) -> f64 {
        if hinted { self.hinted } else { self.strict }
    }
}

/// Decide what a text column should become. Datetime wins over numeric.
pub fn infer_target_format(
    name: &str,
    rates: &ParseRates,
    thresholds: &ParseThresholds,
) -> Option<TargetFormat> {
    if rates.non_missing == 0 {
        return None;
    }
    if rates.datetime >= thresholds.for_hint(has_datetime_hint(name)) {
        return Some(TargetFormat::Datetime);
    }
    if rates.numeric >= thresholds.for_hint(has_numeric_hint(name)) {
        return Some(TargetFormat::Numeric);
    }
    None
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, NewChunkedArray, Series};

    use super::*;

    const THRESHOLDS: ParseThresholds = ParseThresholds {
        strict: 0.9,
        hinted: 0.8,
    };

    fn rates(values: &[Option<&str>]) -> ParseRates {
        let ca = StringChunked::from_iter_options("v".into(), values.iter().copied());
        measure_parse_rates(&ca)
    }

    #[test]
    fn test_column_type_from_dtype() {
        let ints = Series::new("a".into(), [1i64, 2]).into_column();
        let text = Series::new("b".into(), ["x", "y"]).into_column();
        assert_eq!(column_type(&ints), Some(ColumnType::Numeric));
        assert_eq!(column_type(&text), Some(ColumnType::Text));
    }

    #[test]
    fn test_columns_of_type() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), [1.0f64, 2.0]).into_column(),
            Series::new("b".into(), ["x", "y"]).into_column(),
            Series::new("c".into(), [3i32, 4]).into_column(),
        ])
        .unwrap();
        assert_eq!(columns_of_type(&df, ColumnType::Numeric), vec!["a", "c"]);
        assert_eq!(columns_of_type(&df, ColumnType::Text), vec!["b"]);
    }

    #[test]
    fn test_name_hints() {
        assert!(has_datetime_hint("Order Date"));
        assert!(has_datetime_hint("last_updated"));
        assert!(has_datetime_hint("birth_dt"));
        assert!(!has_datetime_hint("width"));
        assert!(has_numeric_hint("unit_price"));
        assert!(has_numeric_hint("QTY"));
        assert!(!has_numeric_hint("name"));
    }

    #[test]
    fn test_measure_parse_rates_ignores_missing() {
        let r = rates(&[Some("2024-01-01"), None, Some(" "), Some("2024-02-01")]);
        assert_eq!(r.non_missing, 2);
        assert_eq!(r.datetime, 1.0);
        assert_eq!(r.numeric, 0.0);
    }

    #[test]
    fn test_datetime_wins() {
        let r = rates(&[Some("2024-01-01"), Some("2024-01-02")]);
        assert_eq!(
            infer_target_format("x", &r, &THRESHOLDS),
            Some(TargetFormat::Datetime)
        );
    }

    #[test]
    fn test_numeric_with_currency() {
        let r = rates(&[Some("$1,200"), Some("$35.50"), Some("(12)")]);
        assert_eq!(
            infer_target_format("x", &r, &THRESHOLDS),
            Some(TargetFormat::Numeric)
        );
    }

    #[test]
    fn test_hint_relaxes_threshold() {
        let mut values = vec![Some("10"); 17];
        values.extend([Some("n/a"), Some("tbd"), Some("?")]);
        let r = rates(&values);
        assert!((r.numeric - 0.85).abs() < 1e-9);
        assert_eq!(infer_target_format("notes", &r, &THRESHOLDS), None);
        assert_eq!(
            infer_target_format("total", &r, &THRESHOLDS),
            Some(TargetFormat::Numeric)
        );
    }

    #[test]
    fn test_all_missing_is_unconverted() {
        let r = rates(&[None, None]);
        assert_eq!(infer_target_format("date", &r, &THRESHOLDS), None);
    }
}
