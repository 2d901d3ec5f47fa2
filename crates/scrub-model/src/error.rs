//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or validating a [`crate::CleaningConfig`].
///
/// Every variant is reported before a cleaning run touches any row.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Outlier strategy string is not one of `cap`, `remove`, `none`.
    #[error("unknown outlier strategy '{value}' (expected cap, remove or none)")]
    UnknownOutlierStrategy { value: String },

    /// Text case string is not one of `title`, `lower`, `upper`, `preserve`.
    #[error("unknown text case '{value}' (expected title, lower, upper or preserve)")]
    UnknownTextCase { value: String },

    /// A numeric option is outside its allowed range.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An option has an invalid shape.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Recipe file not found.
    #[error("recipe file not found: {path}")]
    RecipeNotFound { path: PathBuf },

    /// Failed to read recipe file.
    #[error("failed to read recipe {path}: {source}")]
    RecipeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recipe is not valid TOML or does not match the recipe schema.
    #[error("invalid recipe {path}: {source}")]
    RecipeParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Name of the offending option, when the error concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnknownOutlierStrategy { .. } => Some("outliers"),
            Self::UnknownTextCase { .. } => Some("text_case"),
            Self::OutOfRange { field, .. } | Self::Invalid { field, .. } => Some(field),
            Self::RecipeNotFound { .. } | Self::RecipeRead { .. } | Self::RecipeParse { .. } => {
                None
            }
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
