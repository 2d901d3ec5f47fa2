//! Final outcome of a cleaning run.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::summary::{StageSummary, StageTiming};

/// Structured outcome of one cleaning run.
///
/// Produced once by [`ResultBuilder`] and read-only afterwards.
/// `success` is `true` exactly when `errors` is empty; warnings never
/// affect it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningResult {
    rows: usize,
    columns: usize,
    duration_seconds: f64,
    duplicates_removed: usize,
    outliers_handled: usize,
    outliers_by_column: BTreeMap<String, usize>,
    outlier_rows_removed: usize,
    missing_filled: usize,
    missing_by_column: BTreeMap<String, usize>,
    columns_standardized: Vec<String>,
    columns_unconverted: Vec<String>,
    columns_renamed: usize,
    text_columns_cleaned: usize,
    stage_timings: Vec<StageTiming>,
    warnings: Vec<String>,
    errors: Vec<String>,
    success: bool,
}

impl CleaningResult {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Human-readable duration, e.g. `1.23s` or `2m 5s`.
    pub fn duration_display(&self) -> String {
        format_duration(self.duration_seconds)
    }

    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed
    }

    pub fn outliers_handled(&self) -> usize {
        self.outliers_handled
    }

    pub fn outliers_by_column(&self) -> &BTreeMap<String, usize> {
        &self.outliers_by_column
    }

    pub fn outlier_rows_removed(&self) -> usize {
        self.outlier_rows_removed
    }

    pub fn missing_filled(&self) -> usize {
        self.missing_filled
    }

    pub fn missing_by_column(&self) -> &BTreeMap<String, usize> {
        &self.missing_by_column
    }

    pub fn columns_standardized(&self) -> &[String] {
        &self.columns_standardized
    }

    pub fn columns_unconverted(&self) -> &[String] {
        &self.columns_unconverted
    }

    pub fn columns_renamed(&self) -> usize {
        self.columns_renamed
    }

    pub fn text_columns_cleaned(&self) -> usize {
        self.text_columns_cleaned
    }

    pub fn stage_timings(&self) -> &[StageTiming] {
        &self.stage_timings
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn success(&self) -> bool {
        self.success
    }
}

/// Assembles a [`CleaningResult`] from the accumulated stage summary.
#[derive(Debug, Default)]
pub struct ResultBuilder {
    summary: StageSummary,
    errors: Vec<String>,
    rows: usize,
    columns: usize,
    duration: Duration,
}

impl ResultBuilder {
    pub fn new(summary: StageSummary) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    /// Final table shape.
    #[must_use]
    pub fn shape(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    #[must_use]
    pub fn errors(mut self, messages: impl IntoIterator<Item = String>) -> Self {
        self.errors.extend(messages);
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn build(self) -> CleaningResult {
        let summary = self.summary;
        let outliers_handled = summary.outliers_handled();
        let missing_filled = summary.missing_filled();
        let success = self.errors.is_empty();
        CleaningResult {
            rows: self.rows,
            columns: self.columns,
            duration_seconds: self.duration.as_secs_f64(),
            duplicates_removed: summary.duplicates_removed,
            outliers_handled,
            outliers_by_column: summary.outliers_by_column,
            outlier_rows_removed: summary.outlier_rows_removed,
            missing_filled,
            missing_by_column: summary.missing_by_column,
            columns_standardized: summary.columns_standardized,
            columns_unconverted: summary.columns_unconverted,
            columns_renamed: summary.columns_renamed,
            text_columns_cleaned: summary.text_columns_cleaned,
            stage_timings: summary.stage_timings,
            warnings: summary.warnings,
            errors: self.errors,
            success,
        }
    }
}

/// Format elapsed seconds as `1.23s`, `2m 5s` or `1h 2m 3s`.
///
/// # Examples
///
/// ```
/// use scrub_model::format_duration;
///
/// assert_eq!(format_duration(1.234), "1.23s");
/// assert_eq!(format_duration(125.0), "2m 5s");
/// assert_eq!(format_duration(3723.0), "1h 2m 3s");
/// ```
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.2}s");
    }
    let whole = seconds.round() as u64;
    let (hours, rem) = (whole / 3600, whole % 3600);
    let (mins, secs) = (rem / 60, rem % 60);
    if hours == 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{hours}h {mins}m {secs}s")
    }
}
