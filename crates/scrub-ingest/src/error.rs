//! Error types for table I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create an output file.
    #[error("failed to create file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// Extension is neither CSV nor Parquet.
    #[error("unsupported file format '{extension}' for {path} (expected .csv or .parquet)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to decode a Parquet file.
    #[error("failed to read Parquet {path}: {message}")]
    ParquetRead { path: PathBuf, message: String },

    /// Polars could not serialize the table.
    #[error("failed to write {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// True when the request itself is unusable (wrong path, wrong format,
    /// unparseable content), as opposed to the file system failing
    /// underneath a valid request.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::UnsupportedFormat { .. }
                | Self::CsvParse { .. }
                | Self::ParquetRead { .. }
        )
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::UnsupportedFormat {
            path: PathBuf::from("/data/report.xls"),
            extension: "xls".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported file format 'xls' for /data/report.xls (expected .csv or .parquet)"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
        assert!(!ingest_err.is_invalid_input());
    }
}
