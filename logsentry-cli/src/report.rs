//! Text reporter for `logsentry analyze`
//!
//! [`AnalysisReport`] renders the dashboard (general stats, methods, top lists,
//! status codes, hourly histogram, threats) followed by export results and the
//! executive summary. In JSON mode it serialises as the bare `Statistics` value.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use serde::{Serialize, Serializer};

use logsentry_analyzer::detect::behavior::format_span;
use logsentry_analyzer::normalize::truncate_with_ellipsis;
use logsentry_analyzer::{HealthGrade, StatusClassSummary, Statistics};
use logsentry_core::config::ReportConfig;
use logsentry_core::types::{SecurityThreat, Severity};

use crate::output::Render;

/// Preferred display order for HTTP methods; anything else follows in key order.
pub const METHOD_ORDER: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH"];

const BAR_WIDTH: u64 = 20;
const ITEM_DISPLAY_LEN: usize = 50;
const AGENT_DISPLAY_LEN: usize = 60;
const THREAT_URL_LEN: usize = 40;
const THREAT_DESCRIPTION_LEN: usize = 50;
const PERIOD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of one requested export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportStatus {
    /// `"JSON"` or `"CSV"`
    pub format: &'static str,
    /// Target path as given on the command line
    pub path: String,
    /// Failure message, `None` on success
    pub error: Option<String>,
}

/// Everything the `analyze` command prints.
pub struct AnalysisReport<'a> {
    /// Analyzed file
    pub source: String,
    /// Aggregated statistics
    pub statistics: &'a Statistics,
    /// Status-class breakdown of the ingested entries
    pub status_summary: StatusClassSummary,
    /// Top-N limits and color preference
    pub limits: &'a ReportConfig,
    /// Print parsing stats, per-type counts and timing
    pub verbose: bool,
    /// `--quick` was given
    pub quick: bool,
    /// Time spent ingesting and aggregating
    pub elapsed: Duration,
    /// Results of `--json` / `--csv`
    pub exports: Vec<ExportStatus>,
}

impl Serialize for AnalysisReport<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.statistics.serialize(serializer)
    }
}

impl Render for AnalysisReport<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        render_banner(w)?;

        if self.verbose {
            writeln!(w, "Verbose mode enabled")?;
            writeln!(w, "File: {}", self.source)?;
            if self.quick {
                writeln!(w, "Quick scan mode")?;
            }
        }
        writeln!(w, "Analyzing: {}", self.source.cyan())?;

        let stats = self.statistics;
        if stats.is_empty() {
            writeln!(w, "{}", "No valid log entries found".yellow())?;
            writeln!(
                w,
                "Check that the file uses the Apache/Nginx combined log format"
            )?;
            return Ok(());
        }

        writeln!(
            w,
            "{}",
            format!("{} entries found", stats.total_requests).green()
        )?;
        if self.verbose {
            let s = &self.status_summary;
            writeln!(
                w,
                "Parsing stats: {} success, {} redirect, {} client errors, {} server errors",
                s.success, s.redirect, s.client_error, s.server_error
            )?;
            writeln!(
                w,
                "{} threats detected, {} unique IPs analyzed",
                stats.security_threats.len(),
                stats.unique_ips
            )?;
        }

        render_dashboard(w, stats, self.limits)?;
        render_exports(w, &self.exports)?;

        if self.verbose {
            writeln!(w)?;
            writeln!(
                w,
                "Analysis finished in: {}",
                format!("{:.2?}", self.elapsed).magenta()
            )?;
            let secs = self.elapsed.as_secs_f64();
            if secs > 0.0 {
                writeln!(
                    w,
                    "Performance: {:.0} lines/second",
                    stats.total_requests as f64 / secs
                )?;
            }
        }

        render_executive_summary(w, stats, self.verbose)?;

        writeln!(w)?;
        if stats.security_threats.is_empty() {
            writeln!(
                w,
                "{}",
                "Analysis completed successfully. No threats detected.".green()
            )?;
        } else {
            writeln!(
                w,
                "{}",
                "Security threats were detected. Review the details above.".yellow()
            )?;
        }
        Ok(())
    }
}

fn render_banner(w: &mut dyn Write) -> std::io::Result<()> {
    let title = format!("logsentry v{}", env!("CARGO_PKG_VERSION"));
    let border = "=".repeat(60);
    writeln!(w)?;
    writeln!(w, "{}", border.cyan())?;
    writeln!(w, "{}", format!("{title:^60}").cyan().bold())?;
    writeln!(w, "{}", format!("{:^60}", "Web access log analyzer").cyan())?;
    writeln!(w, "{}", border.cyan())?;
    writeln!(w)
}

fn render_header(w: &mut dyn Write, title: &str) -> std::io::Result<()> {
    let border = "=".repeat(title.chars().count() + 4);
    writeln!(w)?;
    writeln!(w, "{}", border.magenta())?;
    writeln!(w, "{}", format!("| {title} |").magenta())?;
    writeln!(w, "{}", border.magenta())
}

fn render_section(w: &mut dyn Write, title: &str) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", format!("> {title}").yellow())?;
    writeln!(w, "{}", "-".repeat(title.chars().count() + 2).yellow())
}

/// Dashboard sections in display order.
fn render_dashboard(
    w: &mut dyn Write,
    stats: &Statistics,
    limits: &ReportConfig,
) -> std::io::Result<()> {
    render_header(w, "ACCESS LOG ANALYSIS")?;

    render_section(w, "General Statistics")?;
    writeln!(
        w,
        "Total requests: {}",
        stats.total_requests.to_string().cyan()
    )?;
    writeln!(w, "Unique IPs: {}", stats.unique_ips.to_string().green())?;
    writeln!(w, "Error rate: {}", colorize_error_rate(stats.error_rate))?;
    writeln!(
        w,
        "Total bandwidth: {}",
        format_bytes(stats.bandwidth_bytes).blue()
    )?;
    writeln!(
        w,
        "Average response size: {}",
        format_bytes(stats.average_response_size as u64).blue()
    )?;
    if let Some(range) = &stats.time_range {
        writeln!(
            w,
            "Analyzed period: {} to {} ({})",
            range.start.format(PERIOD_FORMAT).to_string().magenta(),
            range.end.format(PERIOD_FORMAT).to_string().magenta(),
            format_span(range.duration()).magenta()
        )?;
    }

    if !stats.methods.is_empty() {
        render_section(w, "HTTP Methods")?;
        writeln!(w, "{:<10} {:>10} {:>11}", "Method", "Requests", "Percentage")?;
        writeln!(w, "{}", "-".repeat(33))?;
        for (method, count) in ordered_methods(&stats.methods) {
            writeln!(
                w,
                "{:<10} {:>10} {:>10.1}%",
                method,
                count,
                stats.percentage_of(count)
            )?;
        }
    }

    render_section(w, &format!("Top {} IPs", limits.top_ips))?;
    render_top_items(w, stats, &stats.top_ips(limits.top_ips), "IP", "Requests")?;

    render_section(w, &format!("Top {} Pages", limits.top_pages))?;
    render_top_items(w, stats, &stats.top_pages(limits.top_pages), "Page", "Hits")?;

    render_section(w, &format!("Top {} User Agents", limits.top_user_agents))?;
    render_top_user_agents(w, &stats.top_user_agents(limits.top_user_agents))?;

    render_section(w, "Status Codes")?;
    render_status_codes(w, &stats.status_codes)?;

    if !stats.hourly_distribution.is_empty() {
        render_section(w, "Hourly Distribution")?;
        render_hourly(w, &stats.hourly_distribution)?;
    }

    if stats.security_threats.is_empty() {
        render_section(w, "Security")?;
        writeln!(w, "{}", "No threats detected".green())?;
    } else {
        render_section(w, "SECURITY ALERTS")?;
        render_threats(w, &stats.sorted_threats())?;
        render_threat_summary(w, stats)?;
    }
    Ok(())
}

fn render_top_items(
    w: &mut dyn Write,
    stats: &Statistics,
    items: &[(&str, u64)],
    item_label: &str,
    count_label: &str,
) -> std::io::Result<()> {
    if items.is_empty() {
        return writeln!(w, "No data available");
    }
    writeln!(
        w,
        "{:<5} {:<50} {:>10} {:>11}",
        "Rank", item_label, count_label, "Percentage"
    )?;
    writeln!(w, "{}", "-".repeat(79))?;
    for (rank, (item, count)) in items.iter().enumerate() {
        writeln!(
            w,
            "{:<5} {:<50} {:>10} {:>10.1}%",
            rank + 1,
            truncate_with_ellipsis(item, ITEM_DISPLAY_LEN),
            count,
            stats.percentage_of(*count)
        )?;
    }
    Ok(())
}

fn render_top_user_agents(w: &mut dyn Write, agents: &[(&str, u64)]) -> std::io::Result<()> {
    if agents.is_empty() {
        return writeln!(w, "No data available");
    }
    writeln!(w, "{:<5} {:<60} {:>10}", "Rank", "User Agent", "Requests")?;
    writeln!(w, "{}", "-".repeat(77))?;
    for (rank, (agent, count)) in agents.iter().enumerate() {
        writeln!(
            w,
            "{:<5} {:<60} {:>10}",
            rank + 1,
            truncate_with_ellipsis(agent, AGENT_DISPLAY_LEN),
            count
        )?;
    }
    Ok(())
}

fn render_status_codes(w: &mut dyn Write, codes: &BTreeMap<u16, u64>) -> std::io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<24} {:>8}  Class",
        "Code", "Description", "Count"
    )?;
    writeln!(w, "{}", "-".repeat(54))?;
    for (&code, &count) in codes {
        writeln!(
            w,
            "{:<6} {:<24} {:>8}  {}",
            code,
            status_description(code),
            count,
            colorize_status_class(code)
        )?;
    }
    Ok(())
}

fn render_hourly(w: &mut dyn Write, hourly: &BTreeMap<u32, u64>) -> std::io::Result<()> {
    let max = hourly.values().copied().max().unwrap_or(0);
    writeln!(w, "{:<6} {:>10}  Graph", "Hour", "Requests")?;
    writeln!(w, "{}", "-".repeat(40))?;
    for hour in 0..24u32 {
        let count = hourly.get(&hour).copied().unwrap_or(0);
        writeln!(
            w,
            "{:<6} {:>10}  {}",
            format!("{hour:02}:00"),
            count,
            histogram_bar(count, max)
        )?;
    }
    Ok(())
}

fn render_threats(w: &mut dyn Write, threats: &[&SecurityThreat]) -> std::io::Result<()> {
    writeln!(
        w,
        "{:<20} {:<16} {:<8} {:<40} {:<8} Description",
        "Type", "IP", "Severity", "URL", "Time"
    )?;
    writeln!(w, "{}", "-".repeat(130))?;
    for threat in threats {
        writeln!(
            w,
            "{:<20} {:<16} {:<8} {:<40} {:<8} {}",
            threat.kind.as_str(),
            threat.ip,
            colorize_severity(threat.severity),
            truncate_with_ellipsis(&threat.url, THREAT_URL_LEN),
            threat.timestamp.format("%H:%M:%S"),
            truncate_with_ellipsis(&threat.description, THREAT_DESCRIPTION_LEN)
        )?;
    }
    Ok(())
}

fn render_threat_summary(w: &mut dyn Write, stats: &Statistics) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", "Threat Summary:".yellow())?;
    writeln!(
        w,
        "  Total: {} threats detected",
        stats.security_threats.len().to_string().red()
    )?;
    render_severity_counts(w, stats, "  ")?;

    writeln!(w)?;
    writeln!(w, "  Detected types:")?;
    for (kind, count) in stats.threats_by_kind() {
        writeln!(w, "    - {kind}: {count}")?;
    }
    Ok(())
}

fn render_severity_counts(
    w: &mut dyn Write,
    stats: &Statistics,
    indent: &str,
) -> std::io::Result<()> {
    let by_severity = stats.threats_by_severity();
    for severity in [Severity::High, Severity::Medium, Severity::Low] {
        let count = by_severity.get(&severity).copied().unwrap_or(0);
        if count > 0 {
            writeln!(
                w,
                "{indent}{}: {}",
                colorize_severity(severity),
                count
            )?;
        }
    }
    Ok(())
}

fn render_exports(w: &mut dyn Write, exports: &[ExportStatus]) -> std::io::Result<()> {
    if exports.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    for export in exports {
        match &export.error {
            None => writeln!(
                w,
                "{}",
                format!("{} export written to {}", export.format, export.path).green()
            )?,
            Some(err) => writeln!(
                w,
                "{}",
                format!("{} export to {} failed: {}", export.format, export.path, err).red()
            )?,
        }
    }
    Ok(())
}

fn render_executive_summary(
    w: &mut dyn Write,
    stats: &Statistics,
    verbose: bool,
) -> std::io::Result<()> {
    render_header(w, "EXECUTIVE SUMMARY")?;

    writeln!(w)?;
    writeln!(w, "KEY FIGURES:")?;
    writeln!(
        w,
        "  - Total requests: {}",
        stats.total_requests.to_string().blue()
    )?;
    writeln!(w, "  - Unique IPs: {}", stats.unique_ips.to_string().blue())?;
    writeln!(w, "  - Error rate: {}", colorize_error_rate(stats.error_rate))?;
    writeln!(
        w,
        "  - Bandwidth: {}",
        format_bytes(stats.bandwidth_bytes).blue()
    )?;

    writeln!(w)?;
    writeln!(w, "SECURITY ANALYSIS:")?;
    if stats.security_threats.is_empty() {
        writeln!(w, "  {}", "No security threats detected".green())?;
    } else {
        writeln!(
            w,
            "  - Total threats: {}",
            stats.security_threats.len().to_string().red()
        )?;
        render_severity_counts(w, stats, "  - ")?;

        if verbose {
            writeln!(w)?;
            writeln!(w, "  THREAT DETAIL:")?;
            for (kind, count) in stats.threats_by_kind() {
                writeln!(w, "    - {kind}: {count} occurrences")?;
            }
        }

        writeln!(w)?;
        writeln!(w, "RECOMMENDATIONS:")?;
        for line in recommendations(&stats.threats_by_severity()) {
            writeln!(w, "{line}")?;
        }
    }

    writeln!(w)?;
    writeln!(w, "HEALTH SCORE:")?;
    writeln!(w, "  - Overall: {}", colorize_health(stats))?;

    if !verbose {
        writeln!(w)?;
        writeln!(w, "Use --verbose for more details")?;
    }
    Ok(())
}

/// Recommendation lines for the given per-severity threat counts.
pub fn recommendations(by_severity: &BTreeMap<Severity, usize>) -> Vec<String> {
    let mut lines = Vec::new();
    if by_severity.get(&Severity::High).is_some_and(|&n| n > 0) {
        lines.push(format!("  {}", "IMMEDIATE ACTION REQUIRED:".red()));
        lines.push("    - Block the malicious IPs".to_owned());
        lines.push("    - Verify application integrity".to_owned());
        lines.push("    - Harden input validation".to_owned());
    }
    if by_severity.get(&Severity::Medium).is_some_and(|&n| n > 0) {
        lines.push(format!("  {}", "RECOMMENDED ACTIONS:".yellow()));
        lines.push("    - Monitor the suspicious IPs".to_owned());
        lines.push("    - Update filtering rules".to_owned());
    }
    lines
}

/// Binary-unit byte formatting (`1.5 KB`, `3.0 MB`).
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// Methods in display order.
pub fn ordered_methods(methods: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let known = METHOD_ORDER
        .iter()
        .filter_map(|method| methods.get_key_value(*method));
    let others = methods
        .iter()
        .filter(|(method, _)| !METHOD_ORDER.contains(&method.as_str()));
    known
        .chain(others)
        .map(|(method, &count)| (method.as_str(), count))
        .collect()
}

/// Histogram bar scaled to [`BAR_WIDTH`]; a non-zero count always gets a mark.
pub fn histogram_bar(count: u64, max: u64) -> String {
    let len = if max > 0 {
        count.saturating_mul(BAR_WIDTH) / max
    } else {
        0
    };
    if len == 0 && count > 0 {
        return "▌".to_owned();
    }
    "█".repeat(usize::try_from(len).unwrap_or(0))
}

/// Reason phrase for common status codes.
pub fn status_description(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// Class label; everything below 300 counts as success.
pub fn status_label(code: u16) -> &'static str {
    match code {
        0..=299 => "Success",
        300..=399 => "Redirect",
        400..=499 => "Client Error",
        _ => "Server Error",
    }
}

fn colorize_status_class(code: u16) -> ColoredString {
    let label = status_label(code);
    match code {
        0..=299 => label.green(),
        300..=399 => label.yellow(),
        400..=499 => label.bright_red(),
        _ => label.red(),
    }
}

fn colorize_error_rate(rate: f64) -> ColoredString {
    let text = format!("{rate:.2}%");
    if rate < 5.0 {
        text.green()
    } else if rate < 15.0 {
        text.yellow()
    } else {
        text.red()
    }
}

fn colorize_severity(severity: Severity) -> ColoredString {
    let text = severity.to_string();
    match severity {
        Severity::High => text.red().bold(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.green(),
    }
}

fn colorize_health(stats: &Statistics) -> ColoredString {
    let score = stats.health_score();
    let text = score.to_string();
    match score.grade {
        HealthGrade::Excellent => text.green(),
        HealthGrade::Good => text.yellow(),
        HealthGrade::Fair => text.red(),
        HealthGrade::Critical => text.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use logsentry_core::types::{ThreatKind, TimeRange};

    fn render(report: &AnalysisReport<'_>) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    fn sample_stats() -> Statistics {
        let start = DateTime::parse_from_rfc3339("2025-09-13T21:00:01+02:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2025-09-13T22:15:00+02:00").unwrap();
        let mut range = TimeRange::at(start);
        range.extend(end);

        let mut stats = Statistics {
            total_requests: 4,
            unique_ips: 2,
            error_rate: 25.0,
            bandwidth_bytes: 3072,
            average_response_size: 768.0,
            time_range: Some(range),
            security_threats: vec![
                SecurityThreat {
                    kind: ThreatKind::AuthFailure,
                    ip: "10.0.0.2".to_owned(),
                    url: "/admin".to_owned(),
                    timestamp: start,
                    severity: Severity::Low,
                    description: "Authentication failure on sensitive page".to_owned(),
                },
                SecurityThreat {
                    kind: ThreatKind::SqlInjection,
                    ip: "10.0.0.1".to_owned(),
                    url: "/search?q=1%20union%20select%20password%20from%20users".to_owned(),
                    timestamp: end,
                    severity: Severity::High,
                    description: "SQL injection attempt detected in URL".to_owned(),
                },
            ],
            ..Default::default()
        };
        stats.ip_counts.insert("10.0.0.1".to_owned(), 3);
        stats.ip_counts.insert("10.0.0.2".to_owned(), 1);
        stats.page_counts.insert("/search".to_owned(), 3);
        stats.page_counts.insert("/admin".to_owned(), 1);
        stats.user_agent_counts.insert("Mozilla/5.0".to_owned(), 4);
        stats.methods.insert("POST".to_owned(), 1);
        stats.methods.insert("GET".to_owned(), 3);
        stats.status_codes.insert(200, 3);
        stats.status_codes.insert(401, 1);
        stats.hourly_distribution.insert(21, 3);
        stats.hourly_distribution.insert(22, 1);
        stats
    }

    fn report<'a>(stats: &'a Statistics, limits: &'a ReportConfig) -> AnalysisReport<'a> {
        AnalysisReport {
            source: "access.log".to_owned(),
            statistics: stats,
            status_summary: StatusClassSummary {
                total: 4,
                success: 3,
                redirect: 0,
                client_error: 1,
                server_error: 0,
            },
            limits,
            verbose: false,
            quick: false,
            elapsed: Duration::from_millis(5),
            exports: Vec::new(),
        }
    }

    #[test]
    fn format_bytes_uses_binary_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(u64::MAX), "16.0 EB");
    }

    #[test]
    fn methods_follow_preferred_order_then_keys() {
        let methods: BTreeMap<String, u64> = [("PROPFIND", 1), ("PATCH", 2), ("BREW", 1), ("GET", 9), ("DELETE", 3)]
            .into_iter()
            .map(|(m, c)| (m.to_owned(), c))
            .collect();
        let order: Vec<&str> = ordered_methods(&methods).into_iter().map(|(m, _)| m).collect();
        assert_eq!(order, ["GET", "DELETE", "PATCH", "BREW", "PROPFIND"]);
    }

    #[test]
    fn histogram_bar_scaling() {
        assert_eq!(histogram_bar(0, 10), "");
        assert_eq!(histogram_bar(1, 100), "▌");
        assert_eq!(histogram_bar(10, 10).chars().count(), 20);
        assert_eq!(histogram_bar(5, 10).chars().count(), 10);
        assert_eq!(histogram_bar(0, 0), "");
    }

    #[test]
    fn status_phrases_and_classes() {
        assert_eq!(status_description(404), "Not Found");
        assert_eq!(status_description(418), "Unknown");
        assert_eq!(status_label(101), "Success");
        assert_eq!(status_label(304), "Redirect");
        assert_eq!(status_label(429), "Client Error");
        assert_eq!(status_label(503), "Server Error");
    }

    #[test]
    fn recommendations_depend_on_severity() {
        colored::control::set_override(false);
        let mut counts = BTreeMap::new();
        assert!(recommendations(&counts).is_empty());

        counts.insert(Severity::Low, 3);
        assert!(recommendations(&counts).is_empty());

        counts.insert(Severity::High, 1);
        let lines = recommendations(&counts);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("IMMEDIATE ACTION REQUIRED"));

        counts.insert(Severity::Medium, 2);
        assert_eq!(recommendations(&counts).len(), 7);
    }

    #[test]
    fn renders_all_dashboard_sections() {
        let stats = sample_stats();
        let limits = ReportConfig::default();
        let text = render(&report(&stats, &limits));

        for section in [
            "General Statistics",
            "HTTP Methods",
            "Top 10 IPs",
            "Top 10 Pages",
            "Top 5 User Agents",
            "Status Codes",
            "Hourly Distribution",
            "SECURITY ALERTS",
            "Threat Summary:",
            "EXECUTIVE SUMMARY",
        ] {
            assert!(text.contains(section), "missing section {section}");
        }
        assert!(text.contains("Error rate: 25.00%"));
        assert!(text.contains("Total bandwidth: 3.0 KB"));
        assert!(text.contains("Average response size: 768 B"));
        assert!(text.contains("Analyzed period: 2025-09-13 21:00:01 to 2025-09-13 22:15:00 (1h14m59s)"));
        assert!(text.contains("Unauthorized"));
        assert!(text.contains("21:00"));
        assert!(text.contains("Overall: 59/100 (Fair)"));
        assert!(text.contains("Security threats were detected"));
        assert!(text.contains("Use --verbose for more details"));
    }

    #[test]
    fn threats_table_is_sorted_and_truncated() {
        let stats = sample_stats();
        let limits = ReportConfig::default();
        let text = render(&report(&stats, &limits));

        let sql = text.find("SQL_INJECTION ").expect("sql row");
        let auth = text.find("AUTH_FAILURE ").expect("auth row");
        assert!(sql < auth, "HIGH threats come before LOW threats");
        assert!(text.contains("/search?q=1%20union%20select%20passwo..."));
        assert!(!text.contains("password%20from%20users"));
    }

    #[test]
    fn hourly_histogram_has_24_rows() {
        let stats = sample_stats();
        let limits = ReportConfig::default();
        let text = render(&report(&stats, &limits));
        let rows = (0..24)
            .filter(|hour| text.contains(&format!("{hour:02}:00 ")))
            .count();
        assert_eq!(rows, 24);
    }

    #[test]
    fn verbose_adds_parsing_stats_detail_and_timing() {
        let stats = sample_stats();
        let limits = ReportConfig::default();
        let mut verbose = report(&stats, &limits);
        verbose.verbose = true;
        verbose.quick = true;
        let text = render(&verbose);

        assert!(text.contains("Quick scan mode"));
        assert!(text.contains("Parsing stats: 3 success, 0 redirect, 1 client errors, 0 server errors"));
        assert!(text.contains("THREAT DETAIL:"));
        assert!(text.contains("SQL_INJECTION: 1 occurrences"));
        assert!(text.contains("Analysis finished in:"));
        assert!(text.contains("lines/second"));
        assert!(!text.contains("Use --verbose"));

        let quiet = render(&report(&stats, &limits));
        assert!(!quiet.contains("Parsing stats"));
        assert!(!quiet.contains("Analysis finished in:"));
    }

    #[test]
    fn export_results_are_listed() {
        let stats = sample_stats();
        let limits = ReportConfig::default();
        let mut with_exports = report(&stats, &limits);
        with_exports.exports = vec![
            ExportStatus {
                format: "JSON",
                path: "output/results.json".to_owned(),
                error: None,
            },
            ExportStatus {
                format: "CSV",
                path: "/readonly/threats.csv".to_owned(),
                error: Some("permission denied".to_owned()),
            },
        ];
        let text = render(&with_exports);
        assert!(text.contains("JSON export written to output/results.json"));
        assert!(text.contains("CSV export to /readonly/threats.csv failed: permission denied"));
    }

    #[test]
    fn empty_statistics_render_warning_only() {
        let stats = Statistics::default();
        let limits = ReportConfig::default();
        let text = render(&report(&stats, &limits));
        assert!(text.contains("No valid log entries found"));
        assert!(!text.contains("EXECUTIVE SUMMARY"));
    }

    #[test]
    fn clean_run_reports_no_threats() {
        let mut stats = sample_stats();
        stats.security_threats.clear();
        stats.error_rate = 0.0;
        let limits = ReportConfig::default();
        let text = render(&report(&stats, &limits));
        assert!(text.contains("No threats detected"));
        assert!(text.contains("No security threats detected"));
        assert!(text.contains("100/100 (Excellent)"));
        assert!(text.contains("No threats detected."));
    }

    #[test]
    fn custom_limits_change_titles_and_rows() {
        let stats = sample_stats();
        let limits = ReportConfig {
            top_ips: 1,
            ..ReportConfig::default()
        };
        let text = render(&report(&stats, &limits));
        assert!(text.contains("Top 1 IPs"));
        assert!(text.contains("10.0.0.1"));
        assert!(text.contains("75.0%"));
    }

    #[test]
    fn json_serializes_as_statistics() {
        let stats = sample_stats();
        let limits = ReportConfig::default();
        let value = serde_json::to_value(report(&stats, &limits)).unwrap();
        assert_eq!(value["total_requests"], 4);
        assert_eq!(value["security_threats"].as_array().unwrap().len(), 2);
        assert!(value.get("source").is_none());
    }
}
