//! Table I/O for the scrub cleaning pipeline.
//!
//! The cleaning core never touches the file system; this crate loads its
//! input and persists its output.
//!
//! # Formats
//!
//! - **CSV**: header row required, schema inferred from the first 100 rows
//! - **Parquet**: read and written as-is
//!
//! The format is chosen from the file extension. Anything else (`.xls`,
//! `.json`, ...) is rejected with [`IngestError::UnsupportedFormat`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use scrub_ingest::{default_output_path, read_table, write_table};
//!
//! let input = Path::new("exports/customers.csv");
//! let mut df = read_table(input)?;
//! write_table(&mut df, &default_output_path(input))?;
//! ```

mod error;
mod format;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Formats ===
pub use format::{TableFormat, default_output_path};

// === Reading and Writing ===
pub use table::{CSV_INFER_SCHEMA_ROWS, read_table, write_table};
