//! Cleaning configuration assembled from defaults, a recipe, the
//! environment and flags.
//!
//! Precedence, lowest to highest:
//!
//! 1. [`CleaningConfig::default`]
//! 2. the recipe given with `--recipe`
//! 3. `SCRUB_*` environment variables (see [`ENV_VARS`])
//! 4. individual command-line flags

use std::path::Path;

use scrub_model::{CleaningConfig, ConfigError, OutlierStrategy, TextCase, load_recipe};

pub const ENV_OUTLIERS: &str = "SCRUB_OUTLIERS";
pub const ENV_NORMALIZE_COLS: &str = "SCRUB_NORMALIZE_COLS";
pub const ENV_CLEAN_TEXT: &str = "SCRUB_CLEAN_TEXT";
pub const ENV_AUTO_OUTLIER_DETECT: &str = "SCRUB_AUTO_OUTLIER_DETECT";
pub const ENV_TEXT_CASE: &str = "SCRUB_TEXT_CASE";

/// Environment variables read by [`CleanOverrides::from_env`].
pub const ENV_VARS: &[&str] = &[
    ENV_OUTLIERS,
    ENV_NORMALIZE_COLS,
    ENV_CLEAN_TEXT,
    ENV_AUTO_OUTLIER_DETECT,
    ENV_TEXT_CASE,
];

/// One layer of overrides. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanOverrides {
    pub outliers: Option<OutlierStrategy>,
    pub normalize_cols: Option<bool>,
    pub clean_text: Option<bool>,
    pub auto_outlier_detect: Option<bool>,
    pub text_case: Option<TextCase>,
    pub subset: Option<Vec<String>>,
}

impl CleanOverrides {
    /// Read the `SCRUB_*` variables through `lookup`.
    ///
    /// Booleans accept `1/true/yes/on` and `0/false/no/off`, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the option when a value does not parse.
    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            outliers: lookup(ENV_OUTLIERS)
                .map(|v| v.parse::<OutlierStrategy>())
                .transpose()?,
            normalize_cols: env_bool(&lookup, ENV_NORMALIZE_COLS, "normalize_cols")?,
            clean_text: env_bool(&lookup, ENV_CLEAN_TEXT, "clean_text")?,
            auto_outlier_detect: env_bool(
                &lookup,
                ENV_AUTO_OUTLIER_DETECT,
                "auto_outlier_detect",
            )?,
            text_case: lookup(ENV_TEXT_CASE)
                .map(|v| v.parse::<TextCase>())
                .transpose()?,
            subset: None,
        })
    }

    /// Layer these overrides over `base`.
    #[must_use]
    pub fn apply(&self, mut base: CleaningConfig) -> CleaningConfig {
        if let Some(outliers) = self.outliers {
            base.outliers = outliers;
        }
        if let Some(enable) = self.normalize_cols {
            base.normalize_cols = enable;
        }
        if let Some(enable) = self.clean_text {
            base.clean_text = enable;
        }
        if let Some(enable) = self.auto_outlier_detect {
            base.auto_outlier_detect = enable;
        }
        if let Some(case) = self.text_case {
            base.text_case = case;
        }
        if let Some(subset) = &self.subset {
            base.duplicate_subset = Some(subset.clone());
        }
        base
    }
}

fn env_bool<F>(lookup: &F, var: &str, field: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid {
            field,
            reason: format!("{var}={raw:?} is not a boolean"),
        }),
    }
}

/// Build and validate the configuration for one run.
///
/// # Errors
///
/// Returns [`ConfigError`] when the recipe cannot be loaded or the merged
/// configuration is invalid.
pub fn resolve_config(
    recipe: Option<&Path>,
    env: &CleanOverrides,
    flags: &CleanOverrides,
) -> Result<CleaningConfig, ConfigError> {
    let mut config = CleaningConfig::default();
    if let Some(path) = recipe {
        config = load_recipe(path)?.apply(config);
    }
    let config = flags.apply(env.apply(config));
    config.validate()?;
    Ok(config)
}
