//! Deterministic cleaning pipeline for tabular data.
//!
//! # Overview
//!
//! [`clean`] takes an owned [`polars::prelude::DataFrame`] and a
//! [`CleaningConfig`] and runs up to six stages over it:
//!
//! 1. **duplicates**: drop repeated rows, keeping the first
//! 2. **columns**: `Order Date` becomes `order_date`
//! 3. **text**: trim, null tokens, case rules, value maps
//! 4. **formats**: date-like and number-like text becomes typed columns
//! 5. **outliers**: IQR fences, capped or removed
//! 6. **missing**: type-aware imputation
//!
//! The library never reads or writes files; see `scrub-ingest` for that.
//!
//! # Example
//!
//! ```ignore
//! use scrub_clean::clean;
//! use scrub_model::{CleaningConfig, OutlierStrategy};
//!
//! let config = CleaningConfig::default().with_outliers(OutlierStrategy::Remove);
//! let (cleaned, result) = clean(df, &config)?;
//! println!("{} rows in {}", result.rows(), result.duration_display());
//! ```
//!
//! Every stage function is public as well, for callers that want one step
//! without the rest of the pipeline.

pub mod columns;
pub mod duplicates;
pub mod error;
pub mod formats;
pub mod inference;
pub mod missing;
pub mod normalization;
pub mod outliers;
pub mod pipeline;
pub mod stage;
pub mod stats;
pub mod text;

pub use columns::normalize_column_names;
pub use duplicates::remove_duplicates;
pub use error::{CleanError, Result};
pub use formats::{FormatReport, standardize_formats};
pub use inference::{ParseThresholds, TargetFormat};
pub use missing::{MissingReport, fill_missing};
pub use outliers::{IQR_MULTIPLIER, OutlierOptions, OutlierReport, handle_outliers};
pub use pipeline::{EMPTY_INPUT_WARNING, clean};
pub use stage::{CleaningStage, stage_plan};
pub use text::{TextReport, clean_text};

pub use scrub_model::CleaningConfig;
