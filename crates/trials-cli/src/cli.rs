//! CLI argument definitions for the trial search tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tracing::level_filters::LevelFilter;

use trials_cli::logging::LogFormat;
use trials_fetch::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, StudyStatus};
use trials_normalize::{NormalizeOptions, SchemaKind, StudiesPath};
use trials_output::ExportFormat;

#[derive(Parser)]
#[command(
    name = "trial-search",
    version,
    about = "Search clinical-trial registries and export flattened study tables",
    long_about = "Search ClinicalTrials.gov (API v2) and flatten each study into a fixed\n\
                  set of columns for display or CSV / JSON export.\n\n\
                  Saved API responses can be normalized offline with `normalize`."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Query ClinicalTrials.gov and show or export the matching studies.
    Search(SearchArgs),

    /// Normalize a saved JSON response ("-" reads stdin).
    Normalize(NormalizeArgs),

    /// List output fields and where each is read from.
    Fields(FieldsArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text search terms.
    #[arg(long = "term", short = 't', value_name = "TEXT")]
    pub term: Option<String>,

    /// Condition or disease.
    #[arg(long = "condition", value_name = "TEXT")]
    pub condition: Option<String>,

    /// Site location passed to the registry search (e.g. a country).
    #[arg(long = "location", value_name = "TEXT")]
    pub location: Option<String>,

    /// Overall status filter; repeat for several (e.g. recruiting).
    #[arg(long = "status", value_name = "STATUS", value_parser = parse_status)]
    pub statuses: Vec<StudyStatus>,

    /// Studies per page (1-1000).
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Maximum number of pages to fetch.
    #[arg(long = "max-pages", default_value_t = 1)]
    pub max_pages: u32,

    /// Studies endpoint to query.
    #[arg(long = "base-url", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[command(flatten)]
    pub normalize: NormalizeFlags,

    #[command(flatten)]
    pub output: OutputFlags,
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// JSON response file, or "-" for stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub normalize: NormalizeFlags,

    #[command(flatten)]
    pub output: OutputFlags,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Study shape whose sources to list.
    #[arg(long = "schema", value_enum, default_value = "protocol-section")]
    pub schema: SchemaArg,
}

/// Normalizer configuration shared by commands that read responses.
#[derive(Args)]
pub struct NormalizeFlags {
    /// Study shape of the response.
    #[arg(long = "schema", value_enum, default_value = "protocol-section")]
    pub schema: SchemaArg,

    /// Dotted path of the study list in the response.
    #[arg(long = "studies-path", value_name = "PATH", default_value = "studies")]
    pub studies_path: StudiesPath,

    /// Keep only studies with a site in this country.
    #[arg(long = "country", value_name = "NAME")]
    pub country: Option<String>,

    /// Print the raw response when it has no study list.
    #[arg(long = "show-raw")]
    pub show_raw: bool,
}

impl NormalizeFlags {
    pub fn options(&self) -> NormalizeOptions {
        NormalizeOptions::default()
            .with_schema(self.schema.into())
            .with_studies_path(self.studies_path.clone())
    }
}

/// Display and export options.
#[derive(Args)]
pub struct OutputFlags {
    /// Write the table to this file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Export format (default: from the output extension, else csv).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Columns to show in the terminal, comma-separated field names.
    #[arg(
        long = "columns",
        value_name = "FIELDS",
        value_delimiter = ',',
        default_value = "identifier,title,status,phase,sponsor"
    )]
    pub columns: Vec<String>,

    /// List study sites under the table.
    #[arg(long = "locations")]
    pub locations: bool,

    /// Do not print the table (useful with --output).
    #[arg(long = "quiet-table")]
    pub quiet_table: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    Flat,
    ProtocolSection,
}

impl From<SchemaArg> for SchemaKind {
    fn from(value: SchemaArg) -> Self {
        match value {
            SchemaArg::Flat => SchemaKind::Flat,
            SchemaArg::ProtocolSection => SchemaKind::ProtocolSection,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn parse_status(value: &str) -> Result<StudyStatus, String> {
    value.parse().map_err(|err: trials_fetch::FetchError| err.to_string())
}
