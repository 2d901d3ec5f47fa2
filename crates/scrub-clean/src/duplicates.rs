//! Duplicate row elimination.

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use scrub_common::any_to_key;
use scrub_model::{CleaningConfig, StageSummary};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::stage::CleaningStage;

const STAGE: &str = "duplicates";

/// Remove duplicate rows, keeping the first occurrence.
///
/// Rows are compared on `subset` when given, otherwise on every column.
/// A missing cell equals another missing cell but never an empty string.
/// Surviving rows keep their relative order.
///
/// # Returns
///
/// Number of rows removed.
///
/// # Errors
///
/// Returns a column-scoped error, leaving the table untouched, when a
/// subset column does not exist.
pub fn remove_duplicates(df: &mut DataFrame, subset: Option<&[String]>) -> Result<usize> {
    if df.height() < 2 {
        return Ok(0);
    }

    let key_columns: Vec<String> = match subset {
        Some(columns) => {
            if let Some(missing) = columns.iter().find(|name| df.column(name).is_err()) {
                return Err(CleanError::column(
                    STAGE,
                    missing.as_str(),
                    "subset column not found",
                ));
            }
            columns.to_vec()
        }
        None => df.get_column_names_owned().into_iter().map(|n| n.to_string()).collect(),
    };
    if key_columns.is_empty() {
        return Ok(0);
    }

    let columns = key_columns
        .iter()
        .map(|name| df.column(name))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut key = Vec::with_capacity(columns.len());
        for column in &columns {
            key.push(any_to_key(column.get(idx)?));
        }
        keep.push(seen.insert(key));
    }

    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed > 0 {
        let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
        *df = df.filter(&mask)?;
    }
    Ok(removed)
}

/// Pipeline stage wrapping [`remove_duplicates`].
pub struct DeduplicateStage;

impl CleaningStage for DeduplicateStage {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn run(
        &self,
        df: &mut DataFrame,
        config: &CleaningConfig,
        summary: &mut StageSummary,
    ) -> Result<()> {
        let removed = remove_duplicates(df, config.duplicate_subset.as_deref())?;
        debug!(removed, "duplicate rows dropped");
        summary.duplicates_removed += removed;
        Ok(())
    }
}
