//! CLI argument definitions for `donor-tables`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "donor-tables",
    version,
    about = "Reproduce the donation-experiment analysis tables S1-S10",
    long_about = "Reproduce the analysis tables of the symbolic-incentive donation \
                  field experiment.\n\n\
                  The pipeline has two stages: `build` turns the raw vendor extract \
                  (.dta) into the canonical flat dataset, and `tables` fits the fixed \
                  set of models and writes each table as LaTeX. `run` executes both."
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
    /// Build the canonical flat dataset from the raw vendor extract.
    Build(BuildArgs),

    /// Generate tables from an existing canonical dataset.
    Tables(TablesArgs),

    /// Run both stages: build the dataset, then generate every table.
    Run(RunArgs),
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Path to the raw vendor extract (.dta).
    #[arg(value_name = "RAW_DTA")]
    pub raw: PathBuf,

    /// Output path for the canonical dataset.
    #[arg(long = "out", value_name = "CSV")]
    pub out: PathBuf,

    /// Abort on categorical codes outside the known lookup sets instead
    /// of mapping them to the sentinel label.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Fixed threshold for the high/low prior-donation split, replacing
    /// the median computed from the input.
    #[arg(long = "median-override", value_name = "VALUE")]
    pub median_override: Option<f64>,
}

#[derive(Parser)]
pub struct TablesArgs {
    /// Path to the canonical dataset written by `build`.
    #[arg(value_name = "ANALYSIS_CSV")]
    pub dataset: PathBuf,

    /// Directory the LaTeX tables are written into.
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Also render each table to the terminal.
    #[arg(long = "print")]
    pub print: bool,

    /// Generate only the listed tables (e.g. --only s3,s4,s10).
    #[arg(long = "only", value_name = "TABLES", value_delimiter = ',')]
    pub only: Vec<String>,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the raw vendor extract (.dta).
    #[arg(value_name = "RAW_DTA")]
    pub raw: PathBuf,

    /// Output directory for the canonical dataset and the tables.
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Also render each table to the terminal.
    #[arg(long = "print")]
    pub print: bool,

    /// Generate only the listed tables (e.g. --only s3,s4,s10).
    #[arg(long = "only", value_name = "TABLES", value_delimiter = ',')]
    pub only: Vec<String>,

    /// Abort on categorical codes outside the known lookup sets.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Fixed threshold for the high/low prior-donation split.
    #[arg(long = "median-override", value_name = "VALUE")]
    pub median_override: Option<f64>,
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
