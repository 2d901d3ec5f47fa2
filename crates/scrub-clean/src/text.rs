//! Text column cleaning and categorical remapping.
//!
//! - Whitespace is trimmed and collapsed
//! - `nan` / `none` / `null` and blank cells become missing
//! - The configured case rule is applied
//! - Optional per-column value maps replace raw values with canonical ones
//!
//! Value maps also apply to categorical columns, which are read as text for
//! the lookup and cast back to their original dtype.

use std::collections::{BTreeMap, HashMap};

use polars::prelude::{Column, DataFrame, IntoSeries, StringChunkedBuilder};
use scrub_model::{CategoricalMapping, CleaningConfig, ColumnType, StageSummary, TextCase};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::inference::{column_type, text_values};
use crate::normalization::names::normalize_name;
use crate::normalization::text::normalize_cell;
use crate::stage::{CleaningStage, record_issues};

const STAGE: &str = "text";

/// Outcome of [`clean_text`].
#[derive(Debug, Default)]
pub struct TextReport {
    /// Text columns cleaned.
    pub columns_cleaned: usize,
    /// Cells replaced through a value map.
    pub values_mapped: usize,
    /// Columns left untouched, and mapping keys that matched no column.
    pub issues: Vec<CleanError>,
}

/// Clean every text column and apply value maps.
///
/// Mapping keys are matched against column names exactly, then against the
/// normalized column name, so maps keep working after column renaming.
pub fn clean_text(
    df: &mut DataFrame,
    case: TextCase,
    mapping: Option<&CategoricalMapping>,
) -> Result<TextReport> {
    let mut report = TextReport::default();
    let lookups = resolve_mappings(df, case, mapping, &mut report.issues);

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for name in names {
        let column = df.column(&name)?;
        let Some(ty) = column_type(column) else {
            continue;
        };
        let lookup = lookups.get(&name);
        let outcome = match ty {
            ColumnType::Text => clean_text_column(column, case, lookup),
            ColumnType::Categorical => match lookup {
                Some(lookup) => remap_categorical_column(column, lookup),
                None => continue,
            },
            _ => match lookup {
                Some(_) => Err(CleanError::column(
                    STAGE,
                    name.as_str(),
                    format!("value mapping needs a text column, found {ty}"),
                )),
                None => continue,
            },
        };
        match outcome {
            Ok((cleaned, mapped)) => {
                df.with_column(cleaned)?;
                if ty == ColumnType::Text {
                    report.columns_cleaned += 1;
                }
                report.values_mapped += mapped;
                debug!(column = %name, mapped, "text column cleaned");
            }
            Err(err) => report.issues.push(err),
        }
    }
    Ok(report)
}

/// Build exact-match lookups keyed by the actual column name.
///
/// Each map also answers for its raw keys after cell normalization, so
/// `"in progress"` still matches once title case turned it into
/// `"In Progress"`.
fn resolve_mappings(
    df: &DataFrame,
    case: TextCase,
    mapping: Option<&CategoricalMapping>,
    issues: &mut Vec<CleanError>,
) -> HashMap<String, HashMap<String, String>> {
    let mut lookups = HashMap::new();
    let Some(mapping) = mapping else {
        return lookups;
    };
    for (key, values) in mapping {
        let Some(column) = find_column(df, key) else {
            issues.push(CleanError::column(
                STAGE,
                key.as_str(),
                "mapped column not found",
            ));
            continue;
        };
        lookups.insert(column, build_lookup(values, case));
    }
    lookups
}

fn find_column(df: &DataFrame, key: &str) -> Option<String> {
    if df.column(key).is_ok() {
        return Some(key.to_string());
    }
    let normalized = normalize_name(key);
    df.column(&normalized).is_ok().then_some(normalized)
}

fn build_lookup(values: &BTreeMap<String, String>, case: TextCase) -> HashMap<String, String> {
    let mut lookup: HashMap<String, String> = values
        .iter()
        .map(|(raw, canonical)| (raw.clone(), canonical.clone()))
        .collect();
    for (raw, canonical) in values {
        if let Some(cleaned) = normalize_cell(raw, case) {
            lookup.entry(cleaned).or_insert_with(|| canonical.clone());
        }
    }
    lookup
}

fn clean_text_column(
    column: &Column,
    case: TextCase,
    lookup: Option<&HashMap<String, String>>,
) -> Result<(Column, usize)> {
    let values = text_values(column).map_err(|err| rescope(column, err))?;
    let mut builder = StringChunkedBuilder::new(column.name().clone(), values.len());
    let mut mapped = 0;
    for value in &values {
        match value.and_then(|v| normalize_cell(v, case)) {
            Some(cleaned) => match lookup.and_then(|l| l.get(&cleaned)) {
                Some(canonical) => {
                    mapped += 1;
                    builder.append_value(canonical);
                }
                None => builder.append_value(&cleaned),
            },
            None => builder.append_null(),
        }
    }
    Ok((builder.finish().into_series().into(), mapped))
}

fn remap_categorical_column(
    column: &Column,
    lookup: &HashMap<String, String>,
) -> Result<(Column, usize)> {
    let values = text_values(column).map_err(|err| rescope(column, err))?;
    let mut builder = StringChunkedBuilder::new(column.name().clone(), values.len());
    let mut mapped = 0;
    for value in &values {
        match value {
            Some(v) => match lookup.get(v) {
                Some(canonical) => {
                    mapped += 1;
                    builder.append_value(canonical);
                }
                None => builder.append_value(v),
            },
            None => builder.append_null(),
        }
    }
    let remapped: Column = builder.finish().into_series().into();
    let restored = remapped
        .cast(column.dtype())
        .map_err(|err| CleanError::column(STAGE, column.name().as_str(), err.to_string()))?;
    Ok((restored, mapped))
}

fn rescope(column: &Column, err: CleanError) -> CleanError {
    CleanError::column(STAGE, column.name().as_str(), err.to_string())
}

/// Pipeline stage wrapping [`clean_text`].
pub struct CleanTextStage;

impl CleaningStage for CleanTextStage {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn is_enabled(&self, config: &CleaningConfig) -> bool {
        config.clean_text
    }

    fn run(
        &self,
        df: &mut DataFrame,
        config: &CleaningConfig,
        summary: &mut StageSummary,
    ) -> Result<()> {
        let report = clean_text(df, config.text_case, config.categorical_mapping.as_ref())?;
        debug!(
            columns = report.columns_cleaned,
            mapped = report.values_mapped,
            "text cleaned"
        );
        summary.text_columns_cleaned += report.columns_cleaned;
        record_issues(summary, report.issues);
        Ok(())
    }
}
