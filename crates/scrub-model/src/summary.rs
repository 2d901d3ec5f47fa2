//! Counters accumulated while the stages run.

use std::collections::BTreeMap;

use serde::Serialize;

/// Timing and row movement of a single stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTiming {
    pub stage: String,
    pub duration_ms: u128,
    pub rows_before: usize,
    pub rows_after: usize,
}

/// Mutable accumulator handed to each stage in turn.
///
/// Owned by one pipeline run; stages only add to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageSummary {
    pub duplicates_removed: usize,
    pub columns_renamed: usize,
    pub text_columns_cleaned: usize,
    /// Outlier values handled, per column.
    pub outliers_by_column: BTreeMap<String, usize>,
    /// Rows dropped by the outlier stage in remove mode.
    pub outlier_rows_removed: usize,
    /// Missing cells filled, per column.
    pub missing_by_column: BTreeMap<String, usize>,
    pub columns_standardized: Vec<String>,
    pub columns_unconverted: Vec<String>,
    pub stage_timings: Vec<StageTiming>,
    pub warnings: Vec<String>,
}

impl StageSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn record_outliers(&mut self, column: &str, count: usize) {
        if count > 0 {
            *self.outliers_by_column.entry(column.to_string()).or_default() += count;
        }
    }

    pub fn record_missing(&mut self, column: &str, count: usize) {
        if count > 0 {
            *self.missing_by_column.entry(column.to_string()).or_default() += count;
        }
    }

    pub fn record_timing(&mut self, timing: StageTiming) {
        self.stage_timings.push(timing);
    }

    pub fn outliers_handled(&self) -> usize {
        self.outliers_by_column.values().sum()
    }

    pub fn missing_filled(&self) -> usize {
        self.missing_by_column.values().sum()
    }
}
