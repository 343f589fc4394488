//! `logsentry analyze` command handler

use std::path::Path;

use tracing::{info, warn};

use logsentry_analyzer::{AnalysisOutcome, AnalysisPipeline, export_csv, export_json};
use logsentry_core::config::LogsentryConfig;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::OutputWriter;
use crate::report::{AnalysisReport, ExportStatus};

/// Execute the `analyze` command.
///
/// Input problems (missing file, directory, read failure) are fatal.
/// Export problems are reported alongside the analysis and never fail the run.
pub fn execute(
    args: AnalyzeArgs,
    config: &LogsentryConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(file = %args.file.display(), quick = args.quick, "starting analysis");
    if args.quick {
        info!("quick scan requested; running the full analysis");
    }

    let pipeline = AnalysisPipeline::from_config(config)?;
    let outcome = pipeline.run_file(&args.file)?;

    let exports = if outcome.entries.is_empty() {
        warn!(file = %args.file.display(), "no valid log entries found");
        Vec::new()
    } else {
        run_exports(&args, &outcome, &config.export.output_dir)
    };

    let report = AnalysisReport {
        source: args.file.display().to_string(),
        statistics: &outcome.statistics,
        status_summary: outcome.status_summary,
        limits: &config.report,
        verbose: args.verbose,
        quick: args.quick,
        elapsed: outcome.elapsed,
        exports,
    };
    writer.render(&report)?;

    Ok(())
}

fn run_exports(
    args: &AnalyzeArgs,
    outcome: &AnalysisOutcome,
    output_dir: &str,
) -> Vec<ExportStatus> {
    let mut exports = Vec::new();

    if let Some(path) = &args.json {
        let result = export_json(&outcome.statistics, path, output_dir);
        exports.push(export_status("JSON", path, result));
    }
    if let Some(path) = &args.csv {
        let result = export_csv(&outcome.statistics, path, output_dir);
        exports.push(export_status("CSV", path, result));
    }

    exports
}

fn export_status(
    format: &'static str,
    path: &Path,
    result: Result<(), logsentry_analyzer::AnalyzerError>,
) -> ExportStatus {
    let error = result.err().map(|e| {
        warn!(format, path = %path.display(), error = %e, "export failed");
        e.to_string()
    });
    ExportStatus {
        format,
        path: path.display().to_string(),
        error,
    }
}
