//! scrub command-line cleaner.

use clap::{ColorChoice, Parser};
use scrub_cli::exit::{FAILURE, SUCCESS, exit_code_for};
use scrub_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, RecipeCommand};
use crate::commands::{run_clean, run_recipe_show, run_recipe_validate};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(FAILURE);
    }
    let show_progress =
        !log_config.is_verbose() && log_config.log_file.is_none() && io::stderr().is_terminal();

    let outcome = match &cli.command {
        Command::Clean(args) => run_clean(args, show_progress).map(|outcome| {
            print_summary(&outcome);
            if outcome.result.success() {
                SUCCESS
            } else {
                FAILURE
            }
        }),
        Command::Recipe(RecipeCommand::Validate { file }) => {
            run_recipe_validate(file).map(|()| SUCCESS)
        }
        Command::Recipe(RecipeCommand::Show { file }) => run_recipe_show(file).map(|()| SUCCESS),
    };
    let exit_code = match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            exit_code_for(&error)
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
