//! Named cleaning presets stored as TOML.
//!
//! A recipe names a reusable set of cleaning options. Every option is
//! optional; unset options fall through to whatever the recipe is applied
//! over, so precedence is `defaults -> recipe -> CLI flags`.
//!
//! ```toml
//! name = "sales-export"
//! description = "Monthly sales dump from the billing system"
//! outliers = "remove"
//! text_case = "lower"
//!
//! [categorical_mapping.status]
//! "in progress" = "active"
//! "done" = "closed"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{CategoricalMapping, CleaningConfig, OutlierStrategy, TextCase};
use crate::error::{ConfigError, Result};

/// A validated cleaning recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outliers: Option<OutlierStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize_cols: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_outlier_detect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_case: Option<TextCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_mapping: Option<CategoricalMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_subset: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hinted_parse_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skew_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_numeric_fraction: Option<f64>,
}

impl Recipe {
    /// Layer this recipe's options over `base`.
    pub fn apply(&self, base: CleaningConfig) -> CleaningConfig {
        let mut config = base;
        if let Some(outliers) = self.outliers {
            config.outliers = outliers;
        }
        if let Some(enable) = self.normalize_cols {
            config.normalize_cols = enable;
        }
        if let Some(enable) = self.clean_text {
            config.clean_text = enable;
        }
        if let Some(enable) = self.auto_outlier_detect {
            config.auto_outlier_detect = enable;
        }
        if let Some(case) = self.text_case {
            config.text_case = case;
        }
        if let Some(mapping) = &self.categorical_mapping {
            config.categorical_mapping = Some(mapping.clone());
        }
        if let Some(subset) = &self.duplicate_subset {
            config.duplicate_subset = Some(subset.clone());
        }
        if let Some(value) = self.parse_threshold {
            config.parse_threshold = value;
        }
        if let Some(value) = self.hinted_parse_threshold {
            config.hinted_parse_threshold = value;
        }
        if let Some(value) = self.skew_threshold {
            config.skew_threshold = value;
        }
        if let Some(value) = self.min_numeric_fraction {
            config.min_numeric_fraction = value;
        }
        config
    }
}

/// Load and validate a recipe file.
///
/// # Errors
///
/// Returns [`ConfigError::RecipeNotFound`] for a missing file,
/// [`ConfigError::RecipeParse`] for invalid TOML or unknown keys, and
/// the first validation failure of the resulting config.
pub fn load_recipe(path: &Path) -> Result<Recipe> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::RecipeNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::RecipeRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let recipe = parse_recipe(&content, path)?;
    tracing::info!(recipe = %recipe.name, path = %path.display(), "loaded recipe");
    Ok(recipe)
}

/// Parse recipe text. `path` is only used for error messages.
pub fn parse_recipe(content: &str, path: &Path) -> Result<Recipe> {
    let recipe: Recipe = toml::from_str(content).map_err(|source| ConfigError::RecipeParse {
        path: path.to_path_buf(),
        source,
    })?;
    if recipe.name.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "name",
            reason: "recipe name must not be empty".to_string(),
        });
    }
    recipe.apply(CleaningConfig::default()).validate()?;
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    fn recipe_path() -> PathBuf {
        PathBuf::from("recipe.toml")
    }

    #[test]
    fn test_parse_minimal_recipe() {
        let recipe = parse_recipe("name = \"basic\"", &recipe_path()).unwrap();
        assert_eq!(recipe.name, "basic");
        assert_eq!(recipe.apply(CleaningConfig::default()), CleaningConfig::default());
    }

    #[test]
    fn test_recipe_overrides_only_set_fields() {
        let text = r#"
name = "sales"
outliers = "remove"
clean_text = false

[categorical_mapping.status]
"in progress" = "Active"
"#;
        let recipe = parse_recipe(text, &recipe_path()).unwrap();
        let config = recipe.apply(CleaningConfig::default());
        assert_eq!(config.outliers, OutlierStrategy::Remove);
        assert!(!config.clean_text);
        assert!(config.normalize_cols);
        let mapping = config.categorical_mapping.unwrap();
        assert_eq!(mapping["status"]["in progress"], "Active");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_recipe("name = \"x\"\nshuffle = true", &recipe_path()).unwrap_err();
        assert!(matches!(err, ConfigError::RecipeParse { .. }));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = parse_recipe("name = \"x\"\noutliers = \"bogus\"", &recipe_path()).unwrap_err();
        assert!(matches!(err, ConfigError::RecipeParse { .. }));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err =
            parse_recipe("name = \"x\"\nparse_threshold = 2.0", &recipe_path()).unwrap_err();
        assert_eq!(err.field(), Some("parse_threshold"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = parse_recipe("name = \"  \"", &recipe_path()).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_load_recipe_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name = \"file\"\ntext_case = \"upper\"").unwrap();
        let recipe = load_recipe(file.path()).unwrap();
        assert_eq!(recipe.text_case, Some(TextCase::Upper));
    }

    #[test]
    fn test_load_missing_recipe() {
        let err = load_recipe(Path::new("/nonexistent/recipe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::RecipeNotFound { .. }));
    }
}
