//! CLI library components for the scrub cleaner.

pub mod exit;
pub mod logging;
pub mod settings;
