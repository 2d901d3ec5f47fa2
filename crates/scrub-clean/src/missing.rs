//! Missing-value imputation.
//!
//! | column type         | fill value                               | all missing |
//! |---------------------|------------------------------------------|-------------|
//! | numeric             | mean if `|skew| < threshold`, else median | `0`         |
//! | datetime            | median timestamp                         | Unix epoch  |
//! | boolean             | mode, ties to `false`                    | `false`     |
//! | text / categorical  | mode, ties to the smallest value         | `"Unknown"` |
//!
//! Columns without missing cells are left alone, so running the stage twice
//! changes nothing the second time.

use polars::prelude::{
    Column, DataFrame, DataType, IntoColumn, IntoSeries, NamedFrom, Series, StringChunkedBuilder,
};
use scrub_model::{CleaningConfig, ColumnType, StageSummary};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::inference::{column_type, text_values};
use crate::stage::{CleaningStage, record_issues};
use crate::stats::{mean, median, median_i64, mode, skewness, sorted_finite};

const STAGE: &str = "missing";

/// Fill value for text and categorical columns with no values at all.
pub const UNKNOWN_TEXT: &str = "Unknown";

/// Outcome of [`fill_missing`].
#[derive(Debug, Default)]
pub struct MissingReport {
    /// Cells filled per column, for columns that had any.
    pub by_column: Vec<(String, usize)>,
    pub issues: Vec<CleanError>,
}

impl MissingReport {
    pub fn total(&self) -> usize {
        self.by_column.iter().map(|(_, count)| count).sum()
    }
}

/// Fill every missing cell according to its column type.
pub fn fill_missing(df: &mut DataFrame, skew_threshold: f64) -> Result<MissingReport> {
    let mut report = MissingReport::default();
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in names {
        let column = df.column(&name)?;
        let missing = column.null_count();
        if missing == 0 {
            continue;
        }
        let Some(ty) = column_type(column) else {
            debug!(column = %name, dtype = %column.dtype(), "unsupported dtype, not imputed");
            continue;
        };
        let filled = match ty {
            ColumnType::Numeric => fill_numeric(column, skew_threshold),
            ColumnType::Datetime => fill_datetime(column),
            ColumnType::Boolean => fill_boolean(column),
            ColumnType::Text | ColumnType::Categorical => fill_text(column),
        };
        match filled {
            Ok(filled) => {
                df.with_column(filled)?;
                debug!(column = %name, column_type = %ty, filled = missing, "missing values filled");
                report.by_column.push((name, missing));
            }
            Err(err) => report
                .issues
                .push(CleanError::column(STAGE, name.as_str(), err.to_string())),
        }
    }
    Ok(report)
}

fn fill_numeric(column: &Column, skew_threshold: f64) -> Result<Column> {
    let floats = column.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = floats.f64()?.into_iter().collect();
    let present = sorted_finite(&values.iter().flatten().copied().collect::<Vec<_>>());
    let fill = if skewness(&present).abs() < skew_threshold {
        mean(&present)
    } else {
        median(&present)
    }
    .unwrap_or(0.0);

    if column.dtype().is_integer() && fill.fract() == 0.0 {
        return fill_integer(column, fill);
    }
    let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or(fill)).collect();
    Ok(Series::new(column.name().clone(), filled).into_column())
}

/// Fill the null slots of an integer column with a whole `fill`, leaving
/// present values on their original dtype.
fn fill_integer(column: &Column, fill: f64) -> Result<Column> {
    let name = column.name().clone();
    let filled = if column.dtype() == &DataType::UInt64 {
        let fill = fill as u64;
        let values: Vec<u64> = column.u64()?.into_iter().map(|v| v.unwrap_or(fill)).collect();
        Series::new(name, values)
    } else {
        let fill = fill as i64;
        let widened = column.cast(&DataType::Int64)?;
        let values: Vec<i64> = widened.i64()?.into_iter().map(|v| v.unwrap_or(fill)).collect();
        Series::new(name, values)
    };
    Ok(filled.cast(column.dtype())?.into_column())
}

fn fill_datetime(column: &Column) -> Result<Column> {
    let physical = column.to_physical_repr().cast(&DataType::Int64)?;
    let values: Vec<Option<i64>> = physical.i64()?.into_iter().collect();
    let mut present: Vec<i64> = values.iter().flatten().copied().collect();
    present.sort_unstable();
    let fill = median_i64(&present).unwrap_or(0);

    let filled: Vec<i64> = values.iter().map(|v| v.unwrap_or(fill)).collect();
    let dtype = column.dtype();
    let restored = Series::new(column.name().clone(), filled)
        .cast(&dtype.to_physical())?
        .cast(dtype)?;
    Ok(restored.into_column())
}

fn fill_boolean(column: &Column) -> Result<Column> {
    let values: Vec<Option<bool>> = column.bool()?.into_iter().collect();
    let trues = values.iter().filter(|v| **v == Some(true)).count();
    let falses = values.iter().filter(|v| **v == Some(false)).count();
    let fill = trues > falses;
    let filled: Vec<bool> = values.iter().map(|v| v.unwrap_or(fill)).collect();
    Ok(Series::new(column.name().clone(), filled).into_column())
}

fn fill_text(column: &Column) -> Result<Column> {
    let values = text_values(column)?;
    let fill = mode(values.into_iter().flatten())
        .unwrap_or(UNKNOWN_TEXT)
        .to_string();

    let mut builder = StringChunkedBuilder::new(column.name().clone(), values.len());
    for value in &values {
        builder.append_value(value.unwrap_or(&fill));
    }
    let filled: Column = builder.finish().into_series().into();
    match column.dtype() {
        DataType::Categorical(_, _) | DataType::Enum(_, _) => Ok(filled.cast(column.dtype())?),
        _ => Ok(filled),
    }
}

/// Pipeline stage wrapping [`fill_missing`].
pub struct FillMissingStage;

impl CleaningStage for FillMissingStage {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn run(
        &self,
        df: &mut DataFrame,
        config: &CleaningConfig,
        summary: &mut StageSummary,
    ) -> Result<()> {
        let report = fill_missing(df, config.skew_threshold)?;
        for (column, count) in &report.by_column {
            summary.record_missing(column, *count);
        }
        debug!(filled = report.total(), "missing values imputed");
        record_issues(summary, report.issues);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::TimeUnit;

    use super::*;

    const SKEW: f64 = 0.75;

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_numeric_mean_for_symmetric_values() {
        let mut df = frame(vec![
            Series::new("a".into(), [Some(1.0), None, Some(2.0), Some(3.0)]).into_column(),
        ]);
        let report = fill_missing(&mut df, SKEW).unwrap();
        assert_eq!(report.by_column, vec![("a".to_string(), 1)]);
        let values: Vec<_> = df.column("a").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_numeric_median_for_skewed_values() {
        let mut df = frame(vec![
            Series::new(
                "a".into(),
                [Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(100.0), None],
            )
            .into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        let filled = df.column("a").unwrap().f64().unwrap().get(5);
        assert_eq!(filled, Some(1.0));
    }

    #[test]
    fn test_integer_column_keeps_dtype_for_whole_fill() {
        let mut df = frame(vec![
            Series::new("a".into(), [Some(1i64), None, Some(3)]).into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        let column = df.column("a").unwrap();
        assert_eq!(column.dtype(), &DataType::Int64);
        assert_eq!(column.i64().unwrap().get(1), Some(2));
    }

    #[test]
    fn test_integer_column_becomes_float_for_fractional_fill() {
        let mut df = frame(vec![
            Series::new("a".into(), [Some(1i64), None, Some(2)]).into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        let column = df.column("a").unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.f64().unwrap().get(1), Some(1.5));
    }

    #[test]
    fn test_all_missing_numeric_is_zero() {
        let mut df = frame(vec![
            Series::new("a".into(), [None::<f64>, None]).into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        let values: Vec<_> = df.column("a").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_datetime_median_restores_dtype() {
        let dtype = DataType::Datetime(TimeUnit::Milliseconds, None);
        let column = Series::new("ts".into(), [Some(0i64), None, Some(2000), Some(1000)])
            .cast(&dtype)
            .unwrap()
            .into_column();
        let mut df = frame(vec![column]);
        fill_missing(&mut df, SKEW).unwrap();
        let column = df.column("ts").unwrap();
        assert_eq!(column.dtype(), &dtype);
        assert_eq!(column.null_count(), 0);
        let physical = column.to_physical_repr();
        assert_eq!(physical.i64().unwrap().get(1), Some(1000));
    }

    #[test]
    fn test_large_integers_are_not_rounded() {
        let big = 9_007_199_254_740_993i64;
        let mut df = frame(vec![
            Series::new("id".into(), [Some(big), Some(big + 2), None]).into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        let column = df.column("id").unwrap();
        assert_eq!(column.dtype(), &DataType::Int64);
        let ids = column.i64().unwrap();
        assert_eq!(ids.get(0), Some(big));
        assert_eq!(ids.get(1), Some(big + 2));
        assert_eq!(ids.null_count(), 0);
    }

    #[test]
    fn test_unsigned_column_keeps_dtype() {
        let mut df = frame(vec![
            Series::new("n".into(), [Some(u64::MAX), Some(u64::MAX), Some(u64::MAX), None])
                .into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        let column = df.column("n").unwrap();
        assert_eq!(column.dtype(), &DataType::UInt64);
        assert_eq!(column.u64().unwrap().get(0), Some(u64::MAX));
        assert_eq!(column.null_count(), 0);
    }

    #[test]
    fn test_nanosecond_datetime_median_is_exact() {
        let dtype = DataType::Datetime(TimeUnit::Nanoseconds, None);
        let base = 1_700_000_000_123_456_789i64;
        let column = Series::new("ts".into(), [Some(base), None, Some(base + 2)])
            .cast(&dtype)
            .unwrap()
            .into_column();
        let mut df = frame(vec![column]);
        fill_missing(&mut df, SKEW).unwrap();
        let physical = df.column("ts").unwrap().to_physical_repr();
        assert_eq!(physical.i64().unwrap().get(1), Some(base + 1));
    }

    #[test]
    fn test_null_typed_column_becomes_unknown_text() {
        let mut df = frame(vec![Series::new_null("empty".into(), 3).into_column()]);
        let report = fill_missing(&mut df, SKEW).unwrap();
        assert_eq!(report.by_column, vec![("empty".to_string(), 3)]);
        let column = df.column("empty").unwrap();
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 0);
        assert_eq!(column.str().unwrap().get(2), Some(UNKNOWN_TEXT));
    }

    #[test]
    fn test_boolean_tie_goes_to_false() {
        let mut df = frame(vec![
            Series::new("flag".into(), [Some(true), Some(false), None]).into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        assert_eq!(df.column("flag").unwrap().bool().unwrap().get(2), Some(false));
    }

    #[test]
    fn test_text_mode_and_unknown() {
        let mut df = frame(vec![
            Series::new("city".into(), [Some("Paris"), Some("Oslo"), None, Some("Paris")])
                .into_column(),
            Series::new("tie".into(), [Some("b"), Some("a"), None, None]).into_column(),
            Series::new("empty".into(), [None::<&str>, None, None, None]).into_column(),
        ]);
        let report = fill_missing(&mut df, SKEW).unwrap();
        assert_eq!(report.total(), 1 + 2 + 4);
        assert_eq!(df.column("city").unwrap().str().unwrap().get(2), Some("Paris"));
        assert_eq!(df.column("tie").unwrap().str().unwrap().get(3), Some("a"));
        assert_eq!(
            df.column("empty").unwrap().str().unwrap().get(0),
            Some(UNKNOWN_TEXT)
        );
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let mut df = frame(vec![
            Series::new("a".into(), [Some(1.0), None, Some(5.0)]).into_column(),
            Series::new("b".into(), [None, Some("x"), Some("y")]).into_column(),
        ]);
        fill_missing(&mut df, SKEW).unwrap();
        let first = df.clone();
        let report = fill_missing(&mut df, SKEW).unwrap();
        assert_eq!(report.total(), 0);
        assert!(df.equals_missing(&first));
    }
}
