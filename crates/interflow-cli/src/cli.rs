//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use interflow_cli::logging::LogFormat;
use interflow_cli::screen::ROUTE;

#[derive(Parser)]
#[command(
    name = "interflow",
    version,
    about = "Inventory needs: filtering, sorting and stock coverage",
    long_about = "Inventory needs: filtering, sorting and stock coverage.\n\n\
                  Filters follow the same precedence as the web screen: URL query,\n\
                  then the persisted per-route cache, then defaults."
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

    /// Filter cache file (default: filters.json in the platform config folder).
    #[arg(long = "cache-file", value_name = "PATH", global = true)]
    pub cache_file: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table", global = true)]
    pub format: OutputFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the needs list with filters, sort and resolved coverage.
    Needs(NeedsArgs),

    /// Compute stock coverage of needs over a horizon.
    Analyse(AnalyseArgs),

    /// Inspect or clear persisted filters.
    #[command(subcommand)]
    Filters(FiltersCommand),
}

/// Inputs the coverage is computed from.
#[derive(Args)]
pub struct StockArgs {
    /// Stock lines (JSON array).
    #[arg(long = "stock", value_name = "PATH")]
    pub stock: Option<PathBuf>,

    /// Repatriation lines (JSON array).
    #[arg(long = "repatriations", value_name = "PATH")]
    pub repatriations: Option<PathBuf>,

    /// Receptions (JSON array); in-progress ones are reported, not consumed.
    #[arg(long = "receptions", value_name = "PATH")]
    pub receptions: Option<PathBuf>,
}

#[derive(Args)]
pub struct NeedsArgs {
    /// Needs (JSON array or CSV export).
    #[arg(long = "needs", value_name = "PATH")]
    pub needs: PathBuf,

    /// Precomputed coverage records (JSON array).
    ///
    /// When absent, coverage is computed from --stock and --repatriations.
    #[arg(long = "coverage", value_name = "PATH", conflicts_with_all = ["stock", "repatriations", "receptions"])]
    pub coverage: Option<PathBuf>,

    #[command(flatten)]
    pub stock: StockArgs,

    /// URL query string of the screen, e.g. `etat=partiel&tri=echeance&ordre=desc`.
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,

    /// Route the filters are persisted under.
    #[arg(long = "route", default_value = ROUTE)]
    pub route: String,

    /// Change a filter (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Click a column header (repeatable; cycles asc, desc, unsorted).
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Vec<String>,

    /// Restore default filters before applying --set and --sort.
    #[arg(long = "reset")]
    pub reset: bool,
}

#[derive(Args)]
pub struct AnalyseArgs {
    /// Needs (JSON array or CSV export).
    #[arg(long = "needs", value_name = "PATH")]
    pub needs: PathBuf,

    #[command(flatten)]
    pub stock: StockArgs,

    /// First day of the horizon (default: today).
    #[arg(long = "start", value_name = "YYYY-MM-DD", value_parser = parse_day)]
    pub start: Option<NaiveDate>,

    /// Horizon length in days (1 to 365).
    #[arg(long = "horizon", value_name = "DAYS", default_value_t = interflow_coverage::DEFAULT_HORIZON_DAYS)]
    pub horizon: u32,

    /// Analyse every need regardless of due date.
    #[arg(long = "all", conflicts_with_all = ["start", "horizon"])]
    pub all: bool,

    /// Only report this material code.
    #[arg(long = "material", value_name = "CODE")]
    pub material: Option<String>,
}

#[derive(Subcommand)]
pub enum FiltersCommand {
    /// Print the persisted filters of a route.
    Show {
        #[arg(long = "route", default_value = ROUTE)]
        route: String,
    },
    /// Delete the persisted filters of a route.
    Reset {
        #[arg(long = "route", default_value = ROUTE)]
        route: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    interflow_model::dates::parse_date(raw).ok_or_else(|| format!("invalid date `{raw}`"))
}
