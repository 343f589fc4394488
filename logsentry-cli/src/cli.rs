//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// logsentry -- web server access log analyzer and threat detector.
///
/// Use `logsentry <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logsentry", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logsentry.toml configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration path used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "logsentry.toml";

impl Cli {
    /// Whether `--config` points somewhere other than the default location.
    ///
    /// A missing file at the default path falls back to built-in defaults,
    /// a missing explicit path is an error.
    pub fn config_is_explicit(&self) -> bool {
        self.config != PathBuf::from(DEFAULT_CONFIG_PATH)
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an access log file and report statistics and threats.
    Analyze(AnalyzeArgs),

    /// Inspect the built-in detection rules.
    Rules(RulesArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Analyze a combined-format access log.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Access log file to analyze (Apache/Nginx combined format).
    #[arg(short, long)]
    pub file: PathBuf,

    /// Export the full statistics as JSON to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Export the detected threats as CSV to this path.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Show parsing stats, per-type threat counts and timing.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quick scan mode. Accepted for compatibility; analysis is unchanged.
    #[arg(long)]
    pub quick: bool,
}

// ---- rules ----

/// Inspect detection rules.
#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List signature rules and behavioral heuristics.
    List {
        /// Filter by severity (low, medium, high).
        #[arg(long)]
        severity: Option<String>,
    },
}

// ---- config ----

/// Manage logsentry configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, ingest, analysis, report, export).
        #[arg(long)]
        section: Option<String>,
    },
}
