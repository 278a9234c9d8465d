//! CLI argument definitions for the basic cleaning stage.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use listing_artifact::ArtifactSpec;
use listing_cli::pipeline::CleaningJob;
use listing_transform::PriceBounds;

#[derive(Parser)]
#[command(
    name = "basic-cleaning",
    version,
    about = "A very basic data cleaning",
    long_about = "Fetch a raw listings artifact, drop rows outside the price range \
                  and outside New York City, and publish the result as a new \
                  artifact version."
)]
pub struct Cli {
    #[command(flatten)]
    pub job: JobArgs,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Root directory of the artifact store.
    #[arg(long = "artifact-root", value_name = "DIR", default_value = "artifacts")]
    pub artifact_root: PathBuf,

    /// Keep the staged output file when the run fails.
    #[arg(long = "keep-failed-output")]
    pub keep_failed_output: bool,
}

impl Cli {
    /// Whether log output goes to stderr rather than a log file.
    pub fn logs_to_stderr(&self) -> bool {
        self.log_file.is_none()
    }
}

#[derive(Args)]
pub struct JobArgs {
    /// Reference of the input artifact (name, name:latest or name:v<N>).
    #[arg(long = "input_artifact", value_name = "REFERENCE")]
    pub input_artifact: String,

    /// Name of the output artifact.
    #[arg(long = "output_artifact", value_name = "NAME")]
    pub output_artifact: String,

    /// Type of the output artifact.
    #[arg(long = "output_type", value_name = "TYPE")]
    pub output_type: String,

    /// Description of the output artifact.
    #[arg(long = "output_description", value_name = "TEXT")]
    pub output_description: String,

    /// Minimum price to keep (inclusive).
    #[arg(long = "min_price", value_name = "PRICE", allow_negative_numbers = true)]
    pub min_price: f64,

    /// Maximum price to keep (inclusive).
    #[arg(long = "max_price", value_name = "PRICE", allow_negative_numbers = true)]
    pub max_price: f64,
}

impl JobArgs {
    pub fn to_job(&self) -> CleaningJob {
        CleaningJob {
            input_artifact: self.input_artifact.clone(),
            output: ArtifactSpec::new(
                self.output_artifact.as_str(),
                self.output_type.as_str(),
                self.output_description.as_str(),
            ),
            price: PriceBounds::new(self.min_price, self.max_price),
        }
    }
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
