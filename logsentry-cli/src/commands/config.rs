//! `logsentry config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logsentry_core::config::LogsentryConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Section names accepted by `config show --section`.
pub const SECTIONS: [&str; 5] = ["general", "ingest", "analysis", "report", "export"];

/// Execute the `config` command.
///
/// `explicit` tells whether `--config` was given; only then is a missing file an error.
pub fn execute(
    args: ConfigArgs,
    config_path: &Path,
    explicit: bool,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, explicit, writer),
        ConfigAction::Show { section } => execute_show(config_path, explicit, section, writer),
    }
}

/// Load the configuration the same way every command does.
pub fn load_config(config_path: &Path, explicit: bool) -> Result<LogsentryConfig, CliError> {
    let loaded = if explicit {
        LogsentryConfig::load(config_path)
    } else {
        LogsentryConfig::load_or_default(config_path)
    };
    loaded.map_err(|e| CliError::Config(e.to_string()))
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, invalid values, missing file).
fn execute_validate(
    config_path: &Path,
    explicit: bool,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match load_config(config_path, explicit) {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if section name is invalid.
fn execute_show(
    config_path: &Path,
    explicit: bool,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = load_config(config_path, explicit)?;
    let report = ConfigReport::build(config_path, &config, section.as_deref())?;
    writer.render(&report)?;

    Ok(())
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization; JSON output
/// carries the structured `config` value instead.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Selected configuration as a structured value
    pub config: serde_json::Value,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl ConfigReport {
    /// Build the report for the whole configuration or one section.
    pub fn build(
        config_path: &Path,
        config: &LogsentryConfig,
        section: Option<&str>,
    ) -> Result<Self, CliError> {
        let (value, toml_text) = match section {
            None => (serde_json::to_value(config)?, to_toml(config)),
            Some("general") => (
                serde_json::to_value(&config.general)?,
                to_toml(&config.general),
            ),
            Some("ingest") => (
                serde_json::to_value(&config.ingest)?,
                to_toml(&config.ingest),
            ),
            Some("analysis") => (
                serde_json::to_value(&config.analysis)?,
                to_toml(&config.analysis),
            ),
            Some("report") => (
                serde_json::to_value(&config.report)?,
                to_toml(&config.report),
            ),
            Some("export") => (
                serde_json::to_value(&config.export)?,
                to_toml(&config.export),
            ),
            Some(other) => {
                return Err(CliError::Command(format!(
                    "unknown section: {} (expected: {})",
                    other,
                    SECTIONS.join(", ")
                )));
            }
        };

        Ok(Self {
            source: config_path.display().to_string(),
            section: section.map(str::to_owned),
            config: value,
            config_toml: toml_text,
        })
    }
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {})", e))
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  - {}", err)?;
            }
        }

        Ok(())
    }
}
