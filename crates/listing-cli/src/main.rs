//! Basic cleaning stage CLI.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use listing_artifact::LocalArtifactStore;
use listing_cli::logging::{LogConfig, LogFormat, init_logging};
use listing_cli::pipeline::{CleaningOutcome, run_tracked};
use listing_cli::staging::CleanupPolicy;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;
use tracing::{error, warn};

mod cli;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(outcome) => {
            print_summary(&outcome);
            0
        }
        Err(error) => {
            error!("basic cleaning failed: {error:#}");
            if !cli.logs_to_stderr() {
                eprintln!("error: {error:#}");
            }
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<CleaningOutcome> {
    let job = cli.job.to_job();
    if job.price.is_inverted() {
        warn!(
            min_price = job.price.min,
            max_price = job.price.max,
            "min_price is greater than max_price; no rows will be kept"
        );
    }
    let cleanup = if cli.keep_failed_output {
        CleanupPolicy::KeepOnFailure
    } else {
        CleanupPolicy::Always
    };

    let store = LocalArtifactStore::open(&cli.artifact_root)
        .with_context(|| format!("open artifact store {}", cli.artifact_root.display()))?;
    run_tracked(store, &job, cleanup)
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
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
