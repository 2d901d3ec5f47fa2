//! Column name normalization.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use scrub_model::{CleaningConfig, StageSummary};
use tracing::debug;

use crate::error::Result;
use crate::normalization::names::{normalize_name, positional_name};
use crate::stage::CleaningStage;

const STAGE: &str = "columns";

/// Canonical, unique names for `names`, in the same order.
///
/// Collisions after normalization get `_2`, `_3`, ... in first-seen order,
/// skipping suffixes that are already taken.
pub fn unique_normalized_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for (idx, raw) in names.iter().enumerate() {
        let mut base = normalize_name(raw.as_ref());
        if base.is_empty() {
            base = positional_name(idx);
        }
        let mut candidate = base.clone();
        let mut suffix = 2;
        while used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Rename every column to its canonical form.
///
/// # Returns
///
/// Number of columns whose name changed.
pub fn normalize_column_names(df: &mut DataFrame) -> Result<usize> {
    let current: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let normalized = unique_normalized_names(&current);

    let renamed = current
        .iter()
        .zip(&normalized)
        .filter(|(old, new)| old != new)
        .count();
    if renamed == 0 {
        return Ok(0);
    }

    let mut columns = df.get_columns().to_vec();
    for (column, name) in columns.iter_mut().zip(&normalized) {
        column.rename(name.as_str().into());
    }
    *df = DataFrame::new(columns)?;
    Ok(renamed)
}

/// Pipeline stage wrapping [`normalize_column_names`].
pub struct NormalizeColumnsStage;

impl CleaningStage for NormalizeColumnsStage {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn is_enabled(&self, config: &CleaningConfig) -> bool {
        config.normalize_cols
    }

    fn run(
        &self,
        df: &mut DataFrame,
        _config: &CleaningConfig,
        summary: &mut StageSummary,
    ) -> Result<()> {
        let renamed = normalize_column_names(df)?;
        debug!(renamed, "column names normalized");
        summary.columns_renamed += renamed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    #[test]
    fn test_unique_names() {
        let names = ["First Name", "first_name", "FIRST-NAME", "", "Total ($)"];
        assert_eq!(
            unique_normalized_names(&names),
            vec!["first_name", "first_name_2", "first_name_3", "column_4", "total"]
        );
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let names = ["a_2", "a", "A"];
        assert_eq!(unique_normalized_names(&names), vec!["a_2", "a", "a_3"]);
    }

    #[test]
    fn test_normalize_column_names_renames_in_place() {
        let mut df = DataFrame::new(vec![
            Series::new(" Customer ID ".into(), [1i64, 2]).into_column(),
            Series::new("city".into(), ["a", "b"]).into_column(),
        ])
        .unwrap();
        let renamed = normalize_column_names(&mut df).unwrap();
        assert_eq!(renamed, 1);
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["customer_id", "city"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_already_normalized_is_untouched() {
        let mut df =
            DataFrame::new(vec![Series::new("ok".into(), [1i64]).into_column()]).unwrap();
        assert_eq!(normalize_column_names(&mut df).unwrap(), 0);
    }
}
