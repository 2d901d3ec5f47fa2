//! Stage trait and the fixed stage plan.
//!
//! # Architecture
//!
//! Every cleaning step implements [`CleaningStage`]. The pipeline asks
//! [`stage_plan`] once per run for the ordered list of stages paired with
//! whether the configuration enables them, then runs the enabled ones in
//! order against the same table.
//!
//! ```ignore
//! for (stage, enabled) in stage_plan(&config) {
//!     if enabled {
//!         stage.run(&mut df, &config, &mut summary)?;
//!     }
//! }
//! ```

use polars::prelude::DataFrame;
use scrub_model::{CleaningConfig, StageSummary};
use tracing::warn;

use crate::columns::NormalizeColumnsStage;
use crate::duplicates::DeduplicateStage;
use crate::error::{CleanError, Result};
use crate::formats::StandardizeFormatsStage;
use crate::missing::FillMissingStage;
use crate::outliers::OutlierStage;
use crate::text::CleanTextStage;

/// One step of the cleaning pipeline.
///
/// Stages mutate the table in place and add their counters to the shared
/// summary. Column-level problems go into the summary as warnings; an
/// `Err` means the stage could not run at all.
pub trait CleaningStage: Send + Sync {
    /// Short stage name used in logs, timings and messages.
    fn name(&self) -> &'static str;

    /// Whether `config` turns this stage on. Stages run by default.
    fn is_enabled(&self, _config: &CleaningConfig) -> bool {
        true
    }

    /// Run the stage.
    ///
    /// # Errors
    ///
    /// Returns a column-scoped [`CleanError`] when the stage skipped its work
    /// because of one column, and a table-scoped one when the table itself
    /// is unusable.
    fn run(
        &self,
        df: &mut DataFrame,
        config: &CleaningConfig,
        summary: &mut StageSummary,
    ) -> Result<()>;
}

/// Ordered stages paired with whether `config` enables them.
pub fn stage_plan(config: &CleaningConfig) -> Vec<(Box<dyn CleaningStage>, bool)> {
    let stages: Vec<Box<dyn CleaningStage>> = vec![
        Box::new(DeduplicateStage),
        Box::new(NormalizeColumnsStage),
        Box::new(CleanTextStage),
        Box::new(StandardizeFormatsStage),
        Box::new(OutlierStage),
        Box::new(FillMissingStage),
    ];
    stages
        .into_iter()
        .map(|stage| {
            let enabled = stage.is_enabled(config);
            (stage, enabled)
        })
        .collect()
}

/// Record column-scoped problems as warnings.
pub(crate) fn record_issues(summary: &mut StageSummary, issues: Vec<CleanError>) {
    for issue in issues {
        warn!(%issue, "column skipped");
        summary.warn(issue.to_string());
    }
}

#[cfg(test)]
mod tests {
    use scrub_model::OutlierStrategy;

    use super::*;

    fn names(config: &CleaningConfig) -> Vec<(&'static str, bool)> {
        stage_plan(config)
            .iter()
            .map(|(stage, enabled)| (stage.name(), *enabled))
            .collect()
    }

    #[test]
    fn test_default_plan_enables_everything() {
        let plan = names(&CleaningConfig::default());
        assert_eq!(
            plan,
            vec![
                ("duplicates", true),
                ("columns", true),
                ("text", true),
                ("formats", true),
                ("outliers", true),
                ("missing", true),
            ]
        );
    }

    #[test]
    fn test_plan_respects_toggles() {
        let config = CleaningConfig::default()
            .with_normalize_cols(false)
            .with_clean_text(false)
            .with_outliers(OutlierStrategy::None);
        let disabled: Vec<_> = names(&config)
            .into_iter()
            .filter(|(_, enabled)| !enabled)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(disabled, vec!["columns", "text", "outliers"]);
    }
}
