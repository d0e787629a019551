//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rowpipe",
    version,
    about = "Generic delimited-file to relational-store ETL",
    long_about = "Extract typed records from a delimited file, clean them up\n\
                  (dedup, value remap, whitespace trim), and bulk-load the\n\
                  result into a SQLite table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

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
    /// Run the extract -> transform -> load pipeline over a source file.
    Run(RunArgs),

    /// Print the wired entity's field catalog.
    Schema,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the delimited source file (header row required).
    #[arg(value_name = "SOURCE_CSV")]
    pub source: PathBuf,

    /// SQLite database file receiving the bulk load.
    #[arg(long = "database", value_name = "PATH")]
    pub database: PathBuf,

    /// Destination table; must already exist with columns matching the
    /// field catalog.
    #[arg(long = "table", default_value = "taxi_trips")]
    pub table: String,

    /// JSON value-mapping document: {"field": "...", "values": {"old": "new"}}.
    /// Defaults to expanding store_and_fwd_flag N/Y to No/Yes.
    #[arg(long = "mapping", value_name = "JSON")]
    pub mapping: Option<PathBuf>,

    /// Append records removed by deduplication to this file.
    #[arg(long = "duplicates-file", default_value = "duplicates.csv")]
    pub duplicates_file: PathBuf,

    /// Extract and transform, then stop before the load.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
