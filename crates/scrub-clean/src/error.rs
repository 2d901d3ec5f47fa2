//! Error types for the cleaning stages.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by a cleaning stage.
///
/// The scope decides what the pipeline does with it: a column-scoped error
/// leaves that column untouched and becomes a warning, anything else aborts
/// the remaining stages.
#[derive(Debug, Error)]
pub enum CleanError {
    /// A single column could not be processed.
    #[error("{stage}: column '{column}': {message}")]
    Column {
        stage: &'static str,
        column: String,
        message: String,
    },

    /// The table as a whole is unusable for this stage.
    #[error("{stage}: {message}")]
    Table { stage: &'static str, message: String },

    /// Failed DataFrame operation outside any per-column work.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl CleanError {
    pub fn column(stage: &'static str, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Column {
            stage,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn table(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Table {
            stage,
            message: message.into(),
        }
    }

    /// True when only one column is affected and the run may continue.
    pub fn is_column_scoped(&self) -> bool {
        matches!(self, Self::Column { .. })
    }
}

impl From<PolarsError> for CleanError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CleanError::column("duplicates", "id", "column not found");
        assert_eq!(err.to_string(), "duplicates: column 'id': column not found");
        assert!(err.is_column_scoped());
    }

    #[test]
    fn test_error_from_polars_is_table_scoped() {
        let polars_err = PolarsError::ColumnNotFound("test".into());
        let err: CleanError = polars_err.into();
        assert!(matches!(err, CleanError::DataFrame { .. }));
        assert!(!err.is_column_scoped());
    }
}
