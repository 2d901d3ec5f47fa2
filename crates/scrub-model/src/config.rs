//! Options controlling a cleaning run.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Per-column value remapping: column name -> (raw value -> canonical value).
pub type CategoricalMapping = BTreeMap<String, BTreeMap<String, String>>;

/// What the outlier stage does with values outside the IQR fences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierStrategy {
    /// Clip values to the nearest fence.
    #[default]
    Cap,
    /// Drop every row holding at least one outlier.
    Remove,
    /// Leave outliers alone; the stage does not run.
    None,
}

impl OutlierStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cap => "cap",
            Self::Remove => "remove",
            Self::None => "none",
        }
    }
}

impl fmt::Display for OutlierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutlierStrategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cap" => Ok(Self::Cap),
            "remove" => Ok(Self::Remove),
            "none" | "off" => Ok(Self::None),
            _ => Err(ConfigError::UnknownOutlierStrategy {
                value: value.to_string(),
            }),
        }
    }
}

/// Case rule applied to cleaned text cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    /// First letter of each word upper, the rest lower.
    #[default]
    Title,
    Lower,
    Upper,
    /// Keep the original casing.
    Preserve,
}

impl TextCase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Preserve => "preserve",
        }
    }
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextCase {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            "preserve" => Ok(Self::Preserve),
            _ => Err(ConfigError::UnknownTextCase {
                value: value.to_string(),
            }),
        }
    }
}

/// Options for a cleaning run.
///
/// Built by a caller (CLI flags, a [`crate::Recipe`], or code) and only read
/// by the pipeline. Call [`CleaningConfig::validate`] before use; the
/// pipeline does so itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningConfig {
    /// Outlier handling strategy.
    pub outliers: OutlierStrategy,

    /// Canonicalize column names.
    pub normalize_cols: bool,

    /// Clean whitespace, null tokens and casing in text columns.
    pub clean_text: bool,

    /// Skip outlier handling when too few columns are numeric.
    pub auto_outlier_detect: bool,

    /// Case rule for cleaned text.
    pub text_case: TextCase,

    /// Raw -> canonical value maps, keyed by column name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical_mapping: Option<CategoricalMapping>,

    /// Columns compared when looking for duplicates (all columns when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_subset: Option<Vec<String>>,

    /// Minimum share of values that must parse before a text column is converted.
    pub parse_threshold: f64,

    /// Relaxed share used when the column name hints at the target type.
    pub hinted_parse_threshold: f64,

    /// Absolute skewness below which numeric gaps are filled with the mean.
    pub skew_threshold: f64,

    /// Minimum share of numeric columns for auto outlier detection to act.
    pub min_numeric_fraction: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            outliers: OutlierStrategy::Cap,
            normalize_cols: true,
            clean_text: true,
            auto_outlier_detect: true,
            text_case: TextCase::Title,
            categorical_mapping: None,
            duplicate_subset: None,
            parse_threshold: 0.9,
            hinted_parse_threshold: 0.8,
            skew_threshold: 0.75,
            min_numeric_fraction: 0.1,
        }
    }
}

impl CleaningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_outliers(mut self, outliers: OutlierStrategy) -> Self {
        self.outliers = outliers;
        self
    }

    #[must_use]
    pub fn with_normalize_cols(mut self, enable: bool) -> Self {
        self.normalize_cols = enable;
        self
    }

    #[must_use]
    pub fn with_clean_text(mut self, enable: bool) -> Self {
        self.clean_text = enable;
        self
    }

    #[must_use]
    pub fn with_auto_outlier_detect(mut self, enable: bool) -> Self {
        self.auto_outlier_detect = enable;
        self
    }

    #[must_use]
    pub fn with_text_case(mut self, case: TextCase) -> Self {
        self.text_case = case;
        self
    }

    #[must_use]
    pub fn with_categorical_mapping(mut self, mapping: CategoricalMapping) -> Self {
        self.categorical_mapping = Some(mapping);
        self
    }

    #[must_use]
    pub fn with_duplicate_subset(mut self, columns: Vec<String>) -> Self {
        self.duplicate_subset = Some(columns);
        self
    }

    #[must_use]
    pub fn with_parse_threshold(mut self, threshold: f64) -> Self {
        self.parse_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = threshold;
        self
    }

    /// Check every option against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first offending option as a [`ConfigError`].
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("parse_threshold", self.parse_threshold, false)?;
        check_unit_interval("hinted_parse_threshold", self.hinted_parse_threshold, false)?;
        check_unit_interval("min_numeric_fraction", self.min_numeric_fraction, true)?;
        if self.hinted_parse_threshold > self.parse_threshold {
            return Err(ConfigError::Invalid {
                field: "hinted_parse_threshold",
                reason: format!(
                    "{} exceeds parse_threshold {}",
                    self.hinted_parse_threshold, self.parse_threshold
                ),
            });
        }
        if !self.skew_threshold.is_finite() || self.skew_threshold < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "skew_threshold",
                value: self.skew_threshold,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if let Some(mapping) = &self.categorical_mapping {
            if mapping.keys().any(|column| column.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    field: "categorical_mapping",
                    reason: "column names must not be empty".to_string(),
                });
            }
        }
        if let Some(subset) = &self.duplicate_subset {
            if subset.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "duplicate_subset",
                    reason: "at least one column is required".to_string(),
                });
            }
            if subset.iter().any(|column| column.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    field: "duplicate_subset",
                    reason: "column names must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_unit_interval(field: &'static str, value: f64, allow_zero: bool) -> Result<()> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && lower_ok && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}
