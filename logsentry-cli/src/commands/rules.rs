//! `logsentry rules` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use logsentry_analyzer::detect::behavior::{
    BEHAVIOR_SEVERITY, BruteForcePolicy, DdosPolicy, format_span,
};
use logsentry_analyzer::signatures;
use logsentry_core::config::LogsentryConfig;
use logsentry_core::types::{Severity, ThreatKind};

use crate::cli::{RulesAction, RulesArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `rules` command.
pub fn execute(
    args: RulesArgs,
    config: &LogsentryConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        RulesAction::List { severity } => execute_list(config, severity, writer),
    }
}

fn execute_list(
    config: &LogsentryConfig,
    severity_filter: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let filter = severity_filter
        .as_deref()
        .map(|s| {
            Severity::from_str_loose(s).ok_or_else(|| {
                CliError::Command(format!(
                    "unknown severity: {} (expected: low, medium, high)",
                    s
                ))
            })
        })
        .transpose()?;

    let report = RuleListReport::build(config, filter);
    info!(total = report.total, "listing detection rules");
    writer.render(&report)?;

    Ok(())
}

#[derive(Serialize)]
pub struct RuleListReport {
    pub total: usize,
    pub signatures: Vec<SignatureEntry>,
    pub heuristics: Vec<HeuristicEntry>,
}

#[derive(Serialize)]
pub struct SignatureEntry {
    pub kind: ThreatKind,
    pub severity: Severity,
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_status: Option<u16>,
    pub description: String,
    pub pattern: String,
}

#[derive(Serialize)]
pub struct HeuristicEntry {
    pub kind: ThreatKind,
    pub severity: Severity,
    pub condition: String,
}

impl RuleListReport {
    /// Collect the signature table and the behavioral heuristics configured by `config`.
    pub fn build(config: &LogsentryConfig, severity: Option<Severity>) -> Self {
        let keep = |s: Severity| severity.is_none_or(|wanted| wanted == s);

        let signatures: Vec<SignatureEntry> = signatures()
            .iter()
            .filter(|sig| keep(sig.severity))
            .map(|sig| SignatureEntry {
                kind: sig.kind,
                severity: sig.severity,
                fields: sig.fields.iter().map(ToString::to_string).collect(),
                required_status: sig.required_status,
                description: sig.description.label().to_owned(),
                pattern: sig.pattern.to_owned(),
            })
            .collect();

        let brute_force = BruteForcePolicy::from(&config.analysis);
        let ddos = DdosPolicy::from(&config.analysis);
        let heuristics: Vec<HeuristicEntry> = [
            HeuristicEntry {
                kind: ThreatKind::BruteForce,
                severity: BEHAVIOR_SEVERITY,
                condition: format!(
                    "IPs with >= {} requests; >= {} requests within {}",
                    brute_force.min_requests,
                    brute_force.threshold,
                    format_span(brute_force.window)
                ),
            },
            HeuristicEntry {
                kind: ThreatKind::DdosAttempt,
                severity: BEHAVIOR_SEVERITY,
                condition: format!(
                    "> {} requests spanning less than {}",
                    ddos.min_requests,
                    format_span(ddos.max_span)
                ),
            },
        ]
        .into_iter()
        .filter(|h| keep(h.severity))
        .collect();

        Self {
            total: signatures.len() + heuristics.len(),
            signatures,
            heuristics,
        }
    }
}

impl Render for RuleListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Detection Rules ({} total)",
            self.total.to_string().bold()
        )?;

        writeln!(w)?;
        writeln!(w, "{}", "Signatures".bold())?;
        writeln!(
            w,
            "{:<20} {:<10} {:<16} {:<8} Description",
            "Type", "Severity", "Fields", "Status"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;
        for s in &self.signatures {
            let status = s
                .required_status
                .map(|code| code.to_string())
                .unwrap_or_else(|| "any".to_owned());
            writeln!(
                w,
                "{:<20} {:<10} {:<16} {:<8} {}",
                s.kind.as_str(),
                colorize(s.severity),
                s.fields.join(","),
                status,
                s.description
            )?;
        }

        writeln!(w)?;
        writeln!(w, "{}", "Behavioral heuristics".bold())?;
        writeln!(w, "{:<20} {:<10} Condition", "Type", "Severity")?;
        writeln!(w, "{}", "-".repeat(90))?;
        for h in &self.heuristics {
            writeln!(
                w,
                "{:<20} {:<10} {}",
                h.kind.as_str(),
                colorize(h.severity),
                h.condition
            )?;
        }

        Ok(())
    }
}

fn colorize(severity: Severity) -> colored::ColoredString {
    use colored::Colorize;

    let text = severity.to_string();
    match severity {
        Severity::High => text.red(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.green(),
    }
}
