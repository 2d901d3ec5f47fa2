//! Pipeline orchestration.

use std::time::Instant;

use polars::prelude::DataFrame;
use scrub_model::{
    CleaningConfig, CleaningResult, ConfigError, ResultBuilder, StageSummary, StageTiming,
};
use tracing::{debug, error, info, info_span, warn};

use crate::error::CleanError;
use crate::stage::stage_plan;

/// Warning attached to the result of a run over a table without rows.
pub const EMPTY_INPUT_WARNING: &str = "input table has no rows; nothing to clean";

/// Run every enabled cleaning stage over `df`.
///
/// Stages run in a fixed order: duplicates, column names, text, formats,
/// outliers, missing values. Column-level problems become warnings on the
/// result; a table-level failure stops the run and is reported in
/// `errors`, with the table returned as far as it got.
///
/// # Errors
///
/// Returns [`ConfigError`] when `config` is invalid. No stage runs in that
/// case.
pub fn clean(
    mut df: DataFrame,
    config: &CleaningConfig,
) -> Result<(DataFrame, CleaningResult), ConfigError> {
    config.validate()?;

    let start = Instant::now();
    let mut summary = StageSummary::new();
    if df.height() == 0 {
        warn!(columns = df.width(), "empty input");
        summary.warn(EMPTY_INPUT_WARNING);
        let result = ResultBuilder::new(summary)
            .shape(0, df.width())
            .duration(start.elapsed())
            .build();
        return Ok((df, result));
    }

    let mut errors = Vec::new();
    for (stage, enabled) in stage_plan(config) {
        let name = stage.name();
        if !enabled {
            debug!(stage = name, "stage disabled");
            continue;
        }
        if df.width() == 0 {
            let err = CleanError::table(name, "table has no columns");
            error!(%err, "stage cannot run");
            errors.push(err.to_string());
            break;
        }

        let span = info_span!("stage", stage = name);
        let _guard = span.enter();
        let rows_before = df.height();
        let stage_start = Instant::now();
        let outcome = stage.run(&mut df, config, &mut summary);
        let duration = stage_start.elapsed();
        summary.record_timing(StageTiming {
            stage: name.to_string(),
            duration_ms: duration.as_millis(),
            rows_before,
            rows_after: df.height(),
        });

        match outcome {
            Ok(()) => info!(
                rows_before,
                rows_after = df.height(),
                duration_ms = duration.as_millis(),
                duplicates_removed = summary.duplicates_removed,
                outliers_handled = summary.outliers_handled(),
                missing_filled = summary.missing_filled(),
                "stage complete"
            ),
            Err(err) if err.is_column_scoped() => {
                warn!(%err, "stage skipped a column");
                summary.warn(err.to_string());
            }
            Err(err) => {
                error!(%err, "stage failed, remaining stages skipped");
                errors.push(err.to_string());
                break;
            }
        }
    }

    let result = ResultBuilder::new(summary)
        .shape(df.height(), df.width())
        .errors(errors)
        .duration(start.elapsed())
        .build();
    info!(
        rows = result.rows(),
        columns = result.columns(),
        success = result.success(),
        duration = %result.duration_display(),
        "cleaning finished"
    );
    Ok((df, result))
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use scrub_model::OutlierStrategy;

    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Name".into(), ["a", "b"]).into_column(),
            Series::new("Score".into(), [Some(1i64), None]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let config = CleaningConfig::default().with_parse_threshold(1.5);
        assert!(clean(sample(), &config).is_err());
    }

    #[test]
    fn test_timings_follow_enabled_stages() {
        let config = CleaningConfig::default()
            .with_clean_text(false)
            .with_outliers(OutlierStrategy::None);
        let (_, result) = clean(sample(), &config).unwrap();
        let stages: Vec<&str> = result
            .stage_timings()
            .iter()
            .map(|timing| timing.stage.as_str())
            .collect();
        assert_eq!(stages, vec!["duplicates", "columns", "formats", "missing"]);
    }

    #[test]
    fn test_missing_subset_column_becomes_warning() {
        let config = CleaningConfig::default().with_duplicate_subset(vec!["nope".to_string()]);
        let (df, result) = clean(sample(), &config).unwrap();
        assert!(result.success());
        assert_eq!(df.height(), 2);
        assert!(result.warnings().iter().any(|w| w.contains("'nope'")));
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), Vec::<i64>::new()).into_column(),
        ])
        .unwrap();
        let (df, result) = clean(df, &CleaningConfig::default()).unwrap();
        assert_eq!(df.width(), 1);
        assert!(result.success());
        assert_eq!(result.warnings(), [EMPTY_INPUT_WARNING.to_string()]);
        assert!(result.stage_timings().is_empty());
    }
}
