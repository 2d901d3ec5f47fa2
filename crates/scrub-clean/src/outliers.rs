//! IQR-based outlier handling for numeric columns.
//!
//! Fences are `Q1 - 1.5*IQR` and `Q3 + 1.5*IQR` with quartiles taken by
//! linear interpolation. Columns with a zero IQR are skipped.
//!
//! - `cap` clips values to the fences and writes the column back as `Float64`
//! - `remove` computes every column's fences on the unmodified table first,
//!   then drops each row that falls outside any of them in a single filter

use polars::prelude::{
    BooleanChunked, Column, DataFrame, DataType, IntoColumn, NamedFrom, NewChunkedArray, Series,
};
use scrub_common::format_numeric;
use scrub_model::{CleaningConfig, ColumnType, OutlierStrategy, StageSummary};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::inference::columns_of_type;
use crate::stage::{CleaningStage, record_issues};
use crate::stats::{IqrFences, sorted_finite};

const STAGE: &str = "outliers";

/// Fence distance in IQRs.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Auto-detection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierOptions {
    /// Skip the stage when numeric columns are too rare.
    pub auto_detect: bool,
    /// Minimum share of numeric columns when `auto_detect` is on.
    pub min_numeric_fraction: f64,
}

impl Default for OutlierOptions {
    fn default() -> Self {
        Self {
            auto_detect: true,
            min_numeric_fraction: 0.1,
        }
    }
}

/// Outcome of [`handle_outliers`].
#[derive(Debug, Default)]
pub struct OutlierReport {
    /// Outlier values per column, for columns with at least one.
    pub by_column: Vec<(String, usize)>,
    /// Rows dropped in remove mode.
    pub rows_removed: usize,
    /// Set when auto-detection skipped every column.
    pub skipped_reason: Option<String>,
    pub issues: Vec<CleanError>,
}

impl OutlierReport {
    pub fn total(&self) -> usize {
        self.by_column.iter().map(|(_, count)| count).sum()
    }
}

/// Detect and handle outliers in every numeric column.
pub fn handle_outliers(
    df: &mut DataFrame,
    strategy: OutlierStrategy,
    options: &OutlierOptions,
) -> Result<OutlierReport> {
    let mut report = OutlierReport::default();
    if strategy == OutlierStrategy::None || df.height() == 0 {
        return Ok(report);
    }
    let numeric = columns_of_type(df, ColumnType::Numeric);
    if numeric.is_empty() {
        return Ok(report);
    }

    let fraction = numeric.len() as f64 / df.width() as f64;
    if options.auto_detect && fraction < options.min_numeric_fraction {
        report.skipped_reason = Some(format!(
            "{} of {} columns are numeric, below the {} auto-detect minimum; skipped",
            numeric.len(),
            df.width(),
            format_numeric(options.min_numeric_fraction)
        ));
        return Ok(report);
    }

    let mut drop_rows = vec![false; df.height()];
    for name in &numeric {
        let column = df.column(name)?;
        let values = match numeric_values(column) {
            Ok(values) => values,
            Err(err) => {
                report
                    .issues
                    .push(CleanError::column(STAGE, name.as_str(), err.to_string()));
                continue;
            }
        };
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let Some(fences) = IqrFences::from_sorted(&sorted_finite(&present), IQR_MULTIPLIER) else {
            debug!(column = %name, "no spread, outlier check skipped");
            continue;
        };

        let count = values
            .iter()
            .flatten()
            .filter(|v| is_outside(&fences, **v))
            .count();
        if count == 0 {
            continue;
        }
        debug!(
            column = %name,
            count,
            lower = %format_numeric(fences.lower),
            upper = %format_numeric(fences.upper),
            "outliers found"
        );

        match strategy {
            OutlierStrategy::Cap => {
                let capped: Vec<Option<f64>> = values
                    .iter()
                    .map(|v| v.map(|v| if v.is_nan() { v } else { fences.clamp(v) }))
                    .collect();
                df.with_column(Series::new(name.as_str().into(), capped).into_column())?;
            }
            OutlierStrategy::Remove => {
                for (flag, value) in drop_rows.iter_mut().zip(&values) {
                    if value.is_some_and(|v| is_outside(&fences, v)) {
                        *flag = true;
                    }
                }
            }
            OutlierStrategy::None => {}
        }
        report.by_column.push((name.clone(), count));
    }

    if strategy == OutlierStrategy::Remove {
        let keep: Vec<bool> = drop_rows.iter().map(|drop| !drop).collect();
        let removed = drop_rows.iter().filter(|drop| **drop).count();
        if removed > 0 {
            let mask = BooleanChunked::from_slice("outliers".into(), &keep);
            *df = df.filter(&mask)?;
        }
        report.rows_removed = removed;
    }
    Ok(report)
}

fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

fn is_outside(fences: &IqrFences, value: f64) -> bool {
    value < fences.lower || value > fences.upper
}

/// Pipeline stage wrapping [`handle_outliers`].
pub struct OutlierStage;

impl CleaningStage for OutlierStage {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn is_enabled(&self, config: &CleaningConfig) -> bool {
        config.outliers != OutlierStrategy::None
    }

    fn run(
        &self,
        df: &mut DataFrame,
        config: &CleaningConfig,
        summary: &mut StageSummary,
    ) -> Result<()> {
        let options = OutlierOptions {
            auto_detect: config.auto_outlier_detect,
            min_numeric_fraction: config.min_numeric_fraction,
        };
        let report = handle_outliers(df, config.outliers, &options)?;
        if let Some(reason) = &report.skipped_reason {
            summary.warn(format!("{STAGE}: {reason}"));
        }
        for (column, count) in &report.by_column {
            summary.record_outliers(column, *count);
        }
        summary.outlier_rows_removed += report.rows_removed;
        debug!(
            handled = report.total(),
            rows_removed = report.rows_removed,
            "outliers handled"
        );
        record_issues(summary, report.issues);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_cap_clips_to_fences() {
        let mut df =
            DataFrame::new(vec![Series::new("x".into(), [1i64, 2, 2, 3, 100]).into_column()])
                .unwrap();
        let report =
            handle_outliers(&mut df, OutlierStrategy::Cap, &OutlierOptions::default()).unwrap();
        assert_eq!(report.by_column, vec![("x".to_string(), 1)]);
        assert_eq!(
            f64_values(&df, "x"),
            vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0), Some(4.5)]
        );
        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_cap_keeps_missing() {
        let mut df = DataFrame::new(vec![
            Series::new("x".into(), [Some(1.0), None, Some(2.0), Some(2.0), Some(3.0), Some(-50.0)])
                .into_column(),
        ])
        .unwrap();
        handle_outliers(&mut df, OutlierStrategy::Cap, &OutlierOptions::default()).unwrap();
        let values = f64_values(&df, "x");
        assert_eq!(values[1], None);
        assert_eq!(values[5], Some(0.5));
    }

    #[test]
    fn test_remove_drops_rows_flagged_by_any_column() {
        let mut df = DataFrame::new(vec![
            Series::new("a".into(), [1.0, 2.0, 2.0, 3.0, 100.0, 2.0]).into_column(),
            Series::new("b".into(), [10.0, 11.0, 12.0, 11.0, 10.0, -90.0]).into_column(),
        ])
        .unwrap();
        let report =
            handle_outliers(&mut df, OutlierStrategy::Remove, &OutlierOptions::default())
                .unwrap();
        assert_eq!(report.rows_removed, 2);
        assert_eq!(report.total(), 2);
        assert_eq!(df.height(), 4);
        assert_eq!(
            f64_values(&df, "a"),
            vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_zero_iqr_is_skipped() {
        let mut df = DataFrame::new(vec![
            Series::new("x".into(), [5i64, 5, 5, 5, 500]).into_column(),
        ])
        .unwrap();
        let report =
            handle_outliers(&mut df, OutlierStrategy::Cap, &OutlierOptions::default()).unwrap();
        assert!(report.by_column.is_empty());
        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_auto_detect_skips_mostly_text_tables() {
        let mut columns = vec![Series::new("x".into(), [1i64, 2, 2, 3, 100]).into_column()];
        for idx in 0..10 {
            columns.push(
                Series::new(format!("t{idx}").into(), ["a", "b", "c", "d", "e"]).into_column(),
            );
        }
        let mut df = DataFrame::new(columns).unwrap();
        let report =
            handle_outliers(&mut df, OutlierStrategy::Cap, &OutlierOptions::default()).unwrap();
        assert!(report.skipped_reason.is_some());
        assert!(report.by_column.is_empty());

        let options = OutlierOptions {
            auto_detect: false,
            ..OutlierOptions::default()
        };
        let report = handle_outliers(&mut df, OutlierStrategy::Cap, &options).unwrap();
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_none_strategy_is_noop() {
        let mut df =
            DataFrame::new(vec![Series::new("x".into(), [1i64, 2, 2, 3, 100]).into_column()])
                .unwrap();
        let report =
            handle_outliers(&mut df, OutlierStrategy::None, &OutlierOptions::default()).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(f64_values(&df, "x")[4], Some(100.0));
    }
}
