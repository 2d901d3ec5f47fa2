//! Shared data model for the scrub cleaning pipeline.
//!
//! - [`CleaningConfig`]: the immutable options a cleaning run is driven by
//! - [`Recipe`]: named TOML presets layered over the defaults
//! - [`ColumnType`]: the column classification every stage works from
//! - [`StageSummary`] / [`CleaningResult`]: what a run did, and how it ended

pub mod column;
pub mod config;
pub mod error;
pub mod recipe;
pub mod result;
pub mod summary;

pub use column::ColumnType;
pub use config::{CategoricalMapping, CleaningConfig, OutlierStrategy, TextCase};
pub use error::{ConfigError, Result};
pub use recipe::{Recipe, load_recipe, parse_recipe};
pub use result::{CleaningResult, ResultBuilder, format_duration};
pub use summary::{StageSummary, StageTiming};
