//! File format detection from extensions.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// On-disk table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Detect the format from the file extension (case-insensitive).
    ///
    /// A path without an extension is read as CSV.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "" | "csv" => Ok(Self::Csv),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Output path used when none is given: `<stem>_cleaned.<ext>` next to the
/// input. Inputs without an extension get `.csv`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use scrub_ingest::default_output_path;
///
/// assert_eq!(
///     default_output_path(Path::new("data/sales.csv")),
///     PathBuf::from("data/sales_cleaned.csv")
/// );
/// ```
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let extension = input
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| TableFormat::Csv.extension().to_string());
    input.with_file_name(format!("{stem}_cleaned.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            TableFormat::from_path(Path::new("a/b.CSV")).unwrap(),
            TableFormat::Csv
        );
        assert_eq!(
            TableFormat::from_path(Path::new("b.parquet")).unwrap(),
            TableFormat::Parquet
        );
        assert_eq!(
            TableFormat::from_path(Path::new("export")).unwrap(),
            TableFormat::Csv
        );
        assert!(matches!(
            TableFormat::from_path(Path::new("book.xlsx")),
            Err(IngestError::UnsupportedFormat { extension, .. }) if extension == "xlsx"
        ));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/in.parquet")),
            PathBuf::from("/tmp/in_cleaned.parquet")
        );
        assert_eq!(
            default_output_path(Path::new("export")),
            PathBuf::from("export_cleaned.csv")
        );
    }
}
