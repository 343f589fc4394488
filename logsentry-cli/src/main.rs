//! logsentry binary entry point.

use std::path::Path;

use clap::Parser;
use tracing::debug;

use logsentry_cli::cli::{Cli, Commands};
use logsentry_cli::commands;
use logsentry_cli::error::CliError;
use logsentry_cli::logging::init_tracing;
use logsentry_cli::output::OutputWriter;
use logsentry_core::config::{GeneralConfig, LogsentryConfig};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let explicit = cli.config_is_explicit();
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Analyze(args) => {
            let config = setup(&cli.config, explicit, cli.log_level, cli.no_color)?;
            commands::analyze::execute(args, &config, &writer)
        }
        Commands::Rules(args) => {
            let config = setup(&cli.config, explicit, cli.log_level, cli.no_color)?;
            commands::rules::execute(args, &config, &writer)
        }
        Commands::Config(args) => {
            // A broken file is the subject of `config validate`, not a startup failure.
            let general = GeneralConfig {
                log_level: cli.log_level.unwrap_or_else(|| GeneralConfig::default().log_level),
                ..GeneralConfig::default()
            };
            if let Err(e) = init_tracing(&general) {
                eprintln!("warning: {e}");
            }
            apply_color_choice(cli.no_color, true);
            commands::config::execute(args, &cli.config, explicit, &writer)
        }
    }
}

/// Load configuration, apply `--log-level`, then install tracing and color settings.
fn setup(
    config_path: &Path,
    explicit: bool,
    log_level: Option<String>,
    no_color: bool,
) -> Result<LogsentryConfig, CliError> {
    let mut config = commands::config::load_config(config_path, explicit)?;
    if let Some(level) = log_level {
        config.general.log_level = level;
    }
    init_tracing(&config.general).map_err(|e| CliError::Config(e.to_string()))?;
    apply_color_choice(no_color, config.report.color);
    debug!(path = %config_path.display(), explicit, "configuration loaded");
    Ok(config)
}

fn apply_color_choice(no_color: bool, config_color: bool) {
    if no_color || !config_color {
        colored::control::set_override(false);
    }
}
