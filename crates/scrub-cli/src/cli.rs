//! CLI argument definitions for the scrub cleaner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use scrub_model::{OutlierStrategy, TextCase};

#[derive(Parser)]
#[command(
    name = "scrub",
    version,
    about = "Deterministic cleaning for CSV and Parquet tables",
    long_about = "Clean tabular data: drop duplicate rows, normalize column names and text,\n\
                  convert date-like and currency-like columns, handle outliers and fill\n\
                  missing values. Options come from built-in defaults, an optional TOML\n\
                  recipe, SCRUB_* environment variables, then command-line flags, in\n\
                  increasing precedence."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a CSV or Parquet file.
    Clean(CleanArgs),

    /// Inspect cleaning recipes.
    #[command(subcommand)]
    Recipe(RecipeCommand),
}

#[derive(Args)]
#[command(after_help = "Environment: SCRUB_OUTLIERS, SCRUB_NORMALIZE_COLS, SCRUB_CLEAN_TEXT,\n\
                        SCRUB_AUTO_OUTLIER_DETECT and SCRUB_TEXT_CASE sit between the recipe\n\
                        and the flags.")]
pub struct CleanArgs {
    /// Input table (.csv or .parquet).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (default: <INPUT stem>_cleaned.<ext> next to the input).
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// TOML recipe layered over the defaults.
    #[arg(long = "recipe", value_name = "FILE")]
    pub recipe: Option<PathBuf>,

    /// Outlier handling: cap, remove or none.
    #[arg(long = "outliers", value_name = "STRATEGY")]
    pub outliers: Option<OutlierStrategy>,

    /// Normalize column names to snake_case (default).
    #[arg(long = "normalize-cols", overrides_with = "no_normalize_cols")]
    pub normalize_cols: bool,

    /// Keep column names as they are.
    #[arg(long = "no-normalize-cols", overrides_with = "normalize_cols")]
    pub no_normalize_cols: bool,

    /// Clean whitespace, null tokens and case in text columns (default).
    #[arg(long = "clean-text", overrides_with = "no_clean_text")]
    pub clean_text: bool,

    /// Skip whitespace, null-token and case cleanup of text columns.
    #[arg(long = "no-clean-text", overrides_with = "clean_text")]
    pub no_clean_text: bool,

    /// Skip outlier handling when numeric columns are rare (default).
    #[arg(long = "auto-outlier-detect", overrides_with = "no_auto_outlier_detect")]
    pub auto_outlier_detect: bool,

    /// Handle outliers even when numeric columns are rare.
    #[arg(long = "no-auto-outlier-detect", overrides_with = "auto_outlier_detect")]
    pub no_auto_outlier_detect: bool,

    /// Case rule for text values: title, lower, upper or preserve.
    #[arg(long = "text-case", value_name = "CASE")]
    pub text_case: Option<TextCase>,

    /// Compare only these columns when looking for duplicate rows.
    #[arg(long = "subset", value_name = "COLUMNS", value_delimiter = ',')]
    pub subset: Vec<String>,

    /// Write the cleaning result as JSON.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Clean and report without writing the output table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl CleanArgs {
    /// Tri-state for a `--x/--no-x` pair; the later flag wins.
    pub fn flag_pair(enable: bool, disable: bool) -> Option<bool> {
        match (enable, disable) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub enum RecipeCommand {
    /// Check that a recipe parses and its values are in range.
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the configuration a recipe produces, as TOML.
    Show {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
