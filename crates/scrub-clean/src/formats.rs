//! Datetime and numeric standardization of text columns.
//!
//! A text or categorical column is converted when enough of its values
//! parse:
//!
//! - as dates/times: the column becomes `Datetime(ms)`
//! - otherwise as numbers (currency, percent and accounting formats
//!   included): the column becomes `Float64`
//!
//! Values that fail to parse in a converted column become missing; the
//! imputation stage fills them later. Numeric, datetime and boolean columns
//! are already typed and left alone.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use scrub_model::{CleaningConfig, ColumnType, StageSummary};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::inference::{
    ParseThresholds, TargetFormat, column_type, infer_target_format, measure_parse_rates,
    text_values,
};
use crate::normalization::datetime::{parse_datetime, to_timestamp_ms};
use crate::normalization::numeric::parse_numeric;
use crate::stage::{CleaningStage, record_issues};

const STAGE: &str = "formats";

/// Outcome of [`standardize_formats`].
#[derive(Debug, Default)]
pub struct FormatReport {
    /// Columns converted to a datetime or numeric dtype.
    pub standardized: Vec<String>,
    /// Text columns that met neither threshold.
    pub unconverted: Vec<String>,
    pub issues: Vec<CleanError>,
}

/// Convert datetime-like and numeric-like text columns.
pub fn standardize_formats(
    df: &mut DataFrame,
    thresholds: &ParseThresholds,
) -> Result<FormatReport> {
    let mut report = FormatReport::default();
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in names {
        let column = df.column(&name)?;
        if !column_type(column).is_some_and(ColumnType::is_textual) {
            continue;
        }
        match convert_column(column, thresholds) {
            Ok(Some((converted, target))) => {
                df.with_column(converted)?;
                debug!(column = %name, ?target, "column standardized");
                report.standardized.push(name);
            }
            Ok(None) => report.unconverted.push(name),
            Err(err) => report
                .issues
                .push(CleanError::column(STAGE, name.as_str(), err.to_string())),
        }
    }
    Ok(report)
}

fn convert_column(
    column: &Column,
    thresholds: &ParseThresholds,
) -> Result<Option<(Column, TargetFormat)>> {
    let values = text_values(column)?;
    let rates = measure_parse_rates(&values);
    let name = column.name().clone();
    let Some(target) = infer_target_format(name.as_str(), &rates, thresholds) else {
        debug!(
            column = %name,
            datetime_rate = rates.datetime,
            numeric_rate = rates.numeric,
            "column left as text"
        );
        return Ok(None);
    };

    let converted = match target {
        TargetFormat::Datetime => {
            let millis: Vec<Option<i64>> = values
                .into_iter()
                .map(|v| v.and_then(parse_datetime).map(to_timestamp_ms))
                .collect();
            Series::new(name, millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .into_column()
        }
        TargetFormat::Numeric => {
            let numbers: Vec<Option<f64>> = values
                .into_iter()
                .map(|v| v.and_then(parse_numeric))
                .collect();
            Series::new(name, numbers).into_column()
        }
    };
    Ok(Some((converted, target)))
}

/// Pipeline stage wrapping [`standardize_formats`].
pub struct StandardizeFormatsStage;

impl CleaningStage for StandardizeFormatsStage {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn run(
        &self,
        df: &mut DataFrame,
        config: &CleaningConfig,
        summary: &mut StageSummary,
    ) -> Result<()> {
        let thresholds = ParseThresholds {
            strict: config.parse_threshold,
            hinted: config.hinted_parse_threshold,
        };
        let report = standardize_formats(df, &thresholds)?;
        summary.columns_standardized.extend(report.standardized);
        summary.columns_unconverted.extend(report.unconverted);
        record_issues(summary, report.issues);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: ParseThresholds = ParseThresholds {
        strict: 0.9,
        hinted: 0.8,
    };

    fn text_df(columns: &[(&str, &[Option<&str>])]) -> DataFrame {
        DataFrame::new(
            columns
                .iter()
                .map(|(name, values)| Series::new((*name).into(), *values).into_column())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_converts_dates() {
        let mut df = text_df(&[(
            "signup",
            &[Some("2024-01-15"), Some("01/16/2024"), Some("17-Jan-2024"), None],
        )]);
        let report = standardize_formats(&mut df, &THRESHOLDS).unwrap();
        assert_eq!(report.standardized, vec!["signup"]);
        let column = df.column("signup").unwrap();
        assert_eq!(
            column.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn test_converts_currency_to_float() {
        let mut df = text_df(&[("price", &[Some("$1,200.50"), Some("(30)"), Some("15%")])]);
        standardize_formats(&mut df, &THRESHOLDS).unwrap();
        let values: Vec<_> = df
            .column("price")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(1200.5), Some(-30.0), Some(0.15)]);
    }

    #[test]
    fn test_unparsed_values_become_missing() {
        let mut values = vec![Some("5"); 9];
        values.push(Some("unknown"));
        let mut df = text_df(&[("count", values.as_slice())]);
        standardize_formats(&mut df, &THRESHOLDS).unwrap();
        let column = df.column("count").unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn test_free_text_is_unconverted() {
        let mut df = text_df(&[
            ("notes", &[Some("call back"), Some("2024-01-01"), Some("12")]),
            ("empty", &[None, None, None]),
        ]);
        let report = standardize_formats(&mut df, &THRESHOLDS).unwrap();
        assert!(report.standardized.is_empty());
        assert_eq!(report.unconverted, vec!["notes", "empty"]);
        assert_eq!(df.column("notes").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_typed_columns_are_ignored() {
        let mut df = DataFrame::new(vec![
            Series::new("n".into(), [1i64, 2]).into_column(),
            Series::new("flag".into(), [true, false]).into_column(),
        ])
        .unwrap();
        let report = standardize_formats(&mut df, &THRESHOLDS).unwrap();
        assert!(report.standardized.is_empty());
        assert!(report.unconverted.is_empty());
    }
}
