//! CLI-specific error types and exit code mapping

use logsentry_analyzer::AnalyzerError;
use logsentry_core::error::{ConfigError, IngestError, LogsentryError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The input log file is missing, a directory, or unreadable.
    #[error("input error: {0}")]
    Input(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logsentry-core.
    #[error("{0}")]
    Core(LogsentryError),

    /// Analysis engine failure other than input or configuration.
    #[error("analysis error: {0}")]
    Analyzer(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command / input error |
    /// | 2    | Configuration error             |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Core(LogsentryError::Config(_)) => 2,
            Self::Core(LogsentryError::Io(_)) => 10,
            Self::JsonSerialize(_)
            | Self::Command(_)
            | Self::Input(_)
            | Self::Core(_)
            | Self::Analyzer(_) => 1,
        }
    }
}

impl From<LogsentryError> for CliError {
    fn from(e: LogsentryError) -> Self {
        match e {
            LogsentryError::Ingest(inner) => Self::Input(inner.to_string()),
            other => Self::Core(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::Input(e.to_string())
    }
}

impl From<AnalyzerError> for CliError {
    fn from(e: AnalyzerError) -> Self {
        match e {
            AnalyzerError::Ingest(inner) => Self::Input(inner.to_string()),
            other => Self::Analyzer(other.to_string()),
        }
    }
}
