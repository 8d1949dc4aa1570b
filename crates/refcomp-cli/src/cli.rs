//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use refcomp_cli::config::{DEFAULT_CONFIG_FILE, Overrides, parse_query_override};
use refcomp_core::ClaimPolicy;

#[derive(Parser)]
#[command(
    name = "refcomp",
    version,
    about = "Compare literature search results against a curated reference set",
    long_about = "Run category queries per journal against a search source and score the\n\
                  returned records against a gold standard of curated references.\n\n\
                  Writes precision and recall per category as HTML pages and JSON, plus\n\
                  optional tab-delimited dumps of every returned record and every miss."
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
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every category query for every journal and write the report.
    Compare(CompareArgs),

    /// List the categories that would be evaluated, one per query.
    Categories(SelectionArgs),

    /// List the journals that would be evaluated.
    Journals(SelectionArgs),
}

#[derive(Args)]
pub struct SelectionArgs {
    /// Configuration file.
    #[arg(short = 'c', long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Run only this category code; repeat to select several, in order.
    #[arg(long = "category", value_name = "CODE")]
    pub categories: Vec<String>,

    /// Replace a category's queries with the contents of PATH.
    ///
    /// Repeat for several queries; `CODE=-` keeps the configured ones.
    #[arg(long = "query", value_name = "CODE=PATH", value_parser = parse_query_override)]
    pub queries: Vec<(String, PathBuf)>,

    /// Evaluate this gold-side journal name; repeat to select several.
    ///
    /// Without this flag only triaged journals are evaluated.
    #[arg(long = "journal", value_name = "NAME")]
    pub journals: Vec<String>,
}

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output directory for the report.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Restrict every query to this publication year.
    #[arg(long = "year")]
    pub year: Option<i32>,

    /// Number of false positives listed per journal on category pages.
    #[arg(long = "max-false-positives", value_name = "N")]
    pub max_false_positives: Option<usize>,

    /// Number of false negatives listed per journal on category pages.
    #[arg(long = "max-false-negatives", value_name = "N")]
    pub max_false_negatives: Option<usize>,

    /// Also write tab-delimited dumps of all results and all false negatives.
    #[arg(long = "dump")]
    pub dump: bool,

    /// What to do when two returned records match the same reference.
    #[arg(long = "duplicate-claims", value_enum)]
    pub duplicate_claims: Option<DuplicateClaimsArg>,
}

impl SelectionArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            categories: self.categories.clone(),
            queries: self.queries.clone(),
            journals: self.journals.clone(),
            ..Overrides::default()
        }
    }
}

impl CompareArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            year: self.year,
            max_false_positives: self.max_false_positives,
            max_false_negatives: self.max_false_negatives,
            dump: self.dump,
            duplicate_claims: self.duplicate_claims.map(ClaimPolicy::from),
            ..self.selection.overrides()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicateClaimsArg {
    /// Abort the run.
    Fail,
    /// Count the later record as a false positive and warn.
    Tolerate,
}

impl From<DuplicateClaimsArg> for ClaimPolicy {
    fn from(arg: DuplicateClaimsArg) -> Self {
        match arg {
            DuplicateClaimsArg::Fail => ClaimPolicy::FailFast,
            DuplicateClaimsArg::Tolerate => ClaimPolicy::Tolerate,
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
