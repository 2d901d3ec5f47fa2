use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use scrub_cli::logging::redact_value;
use scrub_cli::settings::{CleanOverrides, resolve_config};
use scrub_clean::clean;
use scrub_common::any_to_string;
use scrub_ingest::{default_output_path, read_table, write_table};
use scrub_model::{CleaningConfig, CleaningResult, load_recipe};
use tracing::{debug, info, info_span, trace};

use crate::cli::CleanArgs;

/// What a `clean` run produced.
pub struct CleanOutcome {
    pub input: PathBuf,
    /// `None` for dry runs.
    pub output: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    pub result: CleaningResult,
}

pub fn run_clean(args: &CleanArgs, show_progress: bool) -> Result<CleanOutcome> {
    let clean_span = info_span!("clean", input = %args.input.display());
    let _clean_guard = clean_span.enter();

    let env = CleanOverrides::from_env(|key| std::env::var(key).ok())
        .context("read SCRUB_* environment variables")?;
    let config = resolve_config(args.recipe.as_deref(), &env, &overrides_from_args(args))
        .context("resolve cleaning configuration")?;
    debug!(?config, "configuration resolved");

    let load_start = Instant::now();
    let df = read_table(&args.input).with_context(|| format!("read {}", args.input.display()))?;
    debug!(
        rows = df.height(),
        columns = df.width(),
        duration_ms = load_start.elapsed().as_millis(),
        "input loaded"
    );

    let spinner = progress_spinner(show_progress, &args.input);
    let cleaned = clean(df, &config);
    spinner.finish_and_clear();
    let (mut df, result) = cleaned.context("validate cleaning configuration")?;
    trace_first_row(&df);

    let output = if args.dry_run {
        info!("dry run, output not written");
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));
        write_table(&mut df, &path).with_context(|| format!("write {}", path.display()))?;
        Some(path)
    };

    if let Some(path) = &args.summary_json {
        write_summary_json(&result, path)?;
    }

    Ok(CleanOutcome {
        input: args.input.clone(),
        output,
        summary_json: args.summary_json.clone(),
        result,
    })
}

pub fn run_recipe_validate(file: &Path) -> Result<()> {
    let recipe = load_recipe(file).with_context(|| format!("load recipe {}", file.display()))?;
    println!("Recipe '{}' is valid: {}", recipe.name, file.display());
    if let Some(description) = &recipe.description {
        println!("  {description}");
    }
    Ok(())
}

pub fn run_recipe_show(file: &Path) -> Result<()> {
    let recipe = load_recipe(file).with_context(|| format!("load recipe {}", file.display()))?;
    let config = recipe.apply(CleaningConfig::default());
    let rendered = toml::to_string(&config).context("render configuration as TOML")?;
    println!("# recipe: {}", recipe.name);
    print!("{rendered}");
    Ok(())
}

fn overrides_from_args(args: &CleanArgs) -> CleanOverrides {
    CleanOverrides {
        outliers: args.outliers,
        normalize_cols: CleanArgs::flag_pair(args.normalize_cols, args.no_normalize_cols),
        clean_text: CleanArgs::flag_pair(args.clean_text, args.no_clean_text),
        auto_outlier_detect: CleanArgs::flag_pair(
            args.auto_outlier_detect,
            args.no_auto_outlier_detect,
        ),
        text_case: args.text_case,
        subset: (!args.subset.is_empty()).then(|| args.subset.clone()),
    }
}

fn progress_spinner(enabled: bool, input: &Path) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Cleaning {}", input.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn write_summary_json(result: &CleaningResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serialize cleaning result")?;
    std::fs::write(path, json).with_context(|| format!("write summary {}", path.display()))?;
    info!(path = %path.display(), "summary written");
    Ok(())
}

fn trace_first_row(df: &DataFrame) {
    if df.height() == 0 || !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    for column in df.get_columns() {
        if let Ok(value) = column.get(0) {
            let rendered = any_to_string(value);
            trace!(
                column = %column.name(),
                value = redact_value(&rendered),
                "first cleaned value"
            );
        }
    }
}
