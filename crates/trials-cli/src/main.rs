//! `trial-search`: query ClinicalTrials.gov and export flattened study tables.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use trials_cli::logging::{LogConfig, init_logging};
use trials_fetch::FetchError;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_fields, run_normalize, run_search};
use crate::summary::print_summary;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Search(args) => run_search(args).map(|summary| print_summary(&summary)),
        Command::Normalize(args) => run_normalize(args).map(|summary| print_summary(&summary)),
        Command::Fields(args) => run_fields(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            if let Some(fetch) = error.downcast_ref::<FetchError>() {
                eprintln!("{}", fetch.user_message());
            }
            ExitCode::FAILURE
        }
    }
}

/// Logging setup from global flags. `--log-level` beats `-v`/`-q`, and
/// either one disables `RUST_LOG`.
fn log_config(cli: &Cli) -> LogConfig {
    let level = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), Into::into);
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let mut config = LogConfig::default()
        .with_level(level)
        .with_format(cli.log_format.into())
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}
