//! Cell-level parsing and normalization.
//!
//! These functions work on single values and know nothing about DataFrames;
//! the stage modules apply them column by column.

pub mod datetime;
pub mod names;
pub mod numeric;
pub mod text;
