//! Reading and writing whole tables.

use std::fs::File;
use std::path::Path;

use polars::prelude::{
    CsvReadOptions, CsvWriter, DataFrame, ParquetReader, ParquetWriter, SerReader, SerWriter,
};
use tracing::info;

use crate::error::{IngestError, Result};
use crate::format::TableFormat;

/// Rows sampled for CSV schema inference.
pub const CSV_INFER_SCHEMA_ROWS: usize = 100;

/// Read a CSV or Parquet file into a DataFrame.
///
/// CSV files must have a header row; empty fields load as nulls.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let format = TableFormat::from_path(path)?;
    if let Err(err) = std::fs::metadata(path) {
        return Err(if err.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        });
    }

    let df = match format {
        TableFormat::Csv => read_csv(path)?,
        TableFormat::Parquet => read_parquet(path)?,
    };
    info!(
        path = %path.display(),
        %format,
        rows = df.height(),
        columns = df.width(),
        "table loaded"
    );
    Ok(df)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let parse_error = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(CSV_INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::ParquetRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Write `df` to `path`, choosing CSV or Parquet from the extension.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    let file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let serialize_error = |e: polars::prelude::PolarsError| IngestError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    match format {
        TableFormat::Csv => CsvWriter::new(file)
            .include_header(true)
            .finish(df)
            .map_err(serialize_error)?,
        TableFormat::Parquet => {
            ParquetWriter::new(file).finish(df).map_err(serialize_error)?;
        }
    }
    info!(
        path = %path.display(),
        %format,
        rows = df.height(),
        columns = df.width(),
        "table written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_with_empty_fields() {
        let file = create_temp_csv("name,age\nAda,36\n,41\nAlan,\n");
        let df = read_table(file.path()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("name").unwrap().null_count(), 1);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_table(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_unsupported_extension_is_rejected_before_io() {
        let result = read_table(Path::new("/nonexistent/report.xls"));
        assert!(matches!(result, Err(IngestError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_write_parquet_then_read() {
        let source = create_temp_csv("id,score\n1,2.5\n2,3.0\n");
        let mut df = read_table(source.path()).unwrap();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("scores.parquet");
        write_table(&mut df, &out).unwrap();

        let loaded = read_table(&out).unwrap();
        assert!(loaded.equals_missing(&df));
    }
}
