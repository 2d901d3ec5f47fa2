//! Shared utilities for the scrub crates.

mod values;

pub use values::{any_to_key, any_to_string, format_numeric};
