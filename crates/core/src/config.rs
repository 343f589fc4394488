//! 설정 관리: logsentry.toml 파싱 및 런타임 설정
//!
//! [`LogsentryConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//! 기본값은 분석 엔진의 고정 상수(정규화 길이 100, 무차별 대입 윈도우 1시간 등)를
//! 그대로 재현하므로 설정 파일이 없어도 동일하게 동작합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGSENTRY_ANALYSIS_BRUTE_FORCE_THRESHOLD=20` 형식)
//! 3. 설정 파일 (`logsentry.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), logsentry_core::error::LogsentryError> {
//! use logsentry_core::config::LogsentryConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogsentryConfig::load("logsentry.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogsentryConfig::parse("[analysis]\nbrute_force_threshold = 20")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogsentryError};

/// logsentry 통합 설정
///
/// `logsentry.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsentryConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 파일 수집 설정
    #[serde(default)]
    pub ingest: IngestConfig,
    /// 통계/위협 분석 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 콘솔 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// 결과 내보내기 설정
    #[serde(default)]
    pub export: ExportConfig,
}

impl LogsentryConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LogsentryError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에서 시작하는 것을 제외하고 [`load`](Self::load)와 같습니다.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LogsentryError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LogsentryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogsentryError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogsentryError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogsentryError> {
        toml::from_str(toml_str).map_err(|e| {
            LogsentryError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGSENTRY_{SECTION}_{FIELD}`
    /// 예: `LOGSENTRY_REPORT_TOP_IPS=20`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGSENTRY_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGSENTRY_GENERAL_LOG_FORMAT");

        // Ingest
        override_usize(
            &mut self.ingest.max_line_length,
            "LOGSENTRY_INGEST_MAX_LINE_LENGTH",
        );

        // Analysis
        override_usize(
            &mut self.analysis.normalize_max_len,
            "LOGSENTRY_ANALYSIS_NORMALIZE_MAX_LEN",
        );
        override_usize(
            &mut self.analysis.bot_snippet_len,
            "LOGSENTRY_ANALYSIS_BOT_SNIPPET_LEN",
        );
        override_usize(
            &mut self.analysis.brute_force_min_requests,
            "LOGSENTRY_ANALYSIS_BRUTE_FORCE_MIN_REQUESTS",
        );
        override_u64(
            &mut self.analysis.brute_force_window_secs,
            "LOGSENTRY_ANALYSIS_BRUTE_FORCE_WINDOW_SECS",
        );
        override_usize(
            &mut self.analysis.brute_force_threshold,
            "LOGSENTRY_ANALYSIS_BRUTE_FORCE_THRESHOLD",
        );
        override_usize(
            &mut self.analysis.ddos_min_requests,
            "LOGSENTRY_ANALYSIS_DDOS_MIN_REQUESTS",
        );
        override_u64(
            &mut self.analysis.ddos_max_span_secs,
            "LOGSENTRY_ANALYSIS_DDOS_MAX_SPAN_SECS",
        );

        // Report
        override_usize(&mut self.report.top_ips, "LOGSENTRY_REPORT_TOP_IPS");
        override_usize(&mut self.report.top_pages, "LOGSENTRY_REPORT_TOP_PAGES");
        override_usize(
            &mut self.report.top_user_agents,
            "LOGSENTRY_REPORT_TOP_USER_AGENTS",
        );
        override_bool(&mut self.report.color, "LOGSENTRY_REPORT_COLOR");

        // Export
        override_string(&mut self.export.output_dir, "LOGSENTRY_EXPORT_OUTPUT_DIR");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogsentryError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.ingest.max_line_length == 0 {
            return Err(invalid(
                "ingest.max_line_length",
                "must be greater than 0".to_owned(),
            ));
        }

        // 말줄임표(...)가 들어갈 자리가 있어야 함
        if self.analysis.normalize_max_len < 4 {
            return Err(invalid(
                "analysis.normalize_max_len",
                "must be at least 4".to_owned(),
            ));
        }
        if self.analysis.bot_snippet_len < 4 {
            return Err(invalid(
                "analysis.bot_snippet_len",
                "must be at least 4".to_owned(),
            ));
        }

        let nonzero = [
            (
                "analysis.brute_force_min_requests",
                self.analysis.brute_force_min_requests as u64,
            ),
            (
                "analysis.brute_force_window_secs",
                self.analysis.brute_force_window_secs,
            ),
            (
                "analysis.brute_force_threshold",
                self.analysis.brute_force_threshold as u64,
            ),
            (
                "analysis.ddos_max_span_secs",
                self.analysis.ddos_max_span_secs,
            ),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0".to_owned()));
            }
        }

        if self.export.output_dir.trim().is_empty() {
            return Err(invalid(
                "export.output_dir",
                "must not be empty".to_owned(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> LogsentryError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 로그 파일 수집 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 최대 라인 길이 (바이트). 초과하는 라인은 잘못된 라인으로 취급
    pub max_line_length: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_line_length: 64 * 1024, // 64KB
        }
    }
}

/// 통계/위협 분석 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 페이지/User-Agent 정규화 최대 길이 (말줄임표 포함)
    pub normalize_max_len: usize,
    /// 봇 탐지 설명에 포함되는 User-Agent 길이
    pub bot_snippet_len: usize,
    /// 무차별 대입 검사 대상이 되는 IP별 최소 요청 수
    pub brute_force_min_requests: usize,
    /// 무차별 대입 슬라이딩 윈도우 (초)
    pub brute_force_window_secs: u64,
    /// 윈도우 내 요청 수 임계값
    pub brute_force_threshold: usize,
    /// DDoS 검사 대상 요청 수 (이 값을 초과해야 함)
    pub ddos_min_requests: usize,
    /// DDoS로 간주하는 최대 요청 구간 (초, 미만)
    pub ddos_max_span_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            normalize_max_len: 100,
            bot_snippet_len: 50,
            brute_force_min_requests: 10,
            brute_force_window_secs: 60 * 60,
            brute_force_threshold: 50,
            ddos_min_requests: 1000,
            ddos_max_span_secs: 10 * 60,
        }
    }
}

/// 콘솔 리포트 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 표시할 상위 IP 수
    pub top_ips: usize,
    /// 표시할 상위 페이지 수
    pub top_pages: usize,
    /// 표시할 상위 User-Agent 수
    pub top_user_agents: usize,
    /// 컬러 출력 여부
    pub color: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_ips: 10,
            top_pages: 10,
            top_user_agents: 5,
            color: true,
        }
    }
}

/// 결과 내보내기 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 내보내기 시 생성되는 출력 디렉토리
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: "output".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = LogsentryConfig::default();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.analysis.normalize_max_len, 100);
        assert_eq!(config.analysis.brute_force_window_secs, 3600);
        assert_eq!(config.analysis.brute_force_threshold, 50);
        assert_eq!(config.analysis.ddos_min_requests, 1000);
        assert_eq!(config.report.top_user_agents, 5);
        assert_eq!(config.export.output_dir, "output");
    }

    #[test]
    fn default_config_passes_validation() {
        LogsentryConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = LogsentryConfig::parse("").unwrap();
        assert_eq!(config, LogsentryConfig::default());
    }

    #[test]
    fn parse_partial_section_keeps_other_defaults() {
        let config = LogsentryConfig::parse(
            r#"
[analysis]
brute_force_threshold = 20
"#,
        )
        .unwrap();
        assert_eq!(config.analysis.brute_force_threshold, 20);
        assert_eq!(config.analysis.brute_force_min_requests, 10);
        assert_eq!(config.report.top_ips, 10);
    }

    #[test]
    fn parse_invalid_toml_fails() {
        let result = LogsentryConfig::parse("[analysis\nfoo = 1");
        assert!(matches!(
            result,
            Err(LogsentryError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = LogsentryConfig::default();
        config.general.log_level = "verbose".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = LogsentryConfig::default();
        config.general.log_format = "xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_tiny_normalize_len() {
        let mut config = LogsentryConfig::default();
        config.analysis.normalize_max_len = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config = LogsentryConfig::default();
        config.analysis.brute_force_window_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("brute_force_window_secs"));
    }

    #[test]
    fn validate_rejects_empty_output_dir() {
        let mut config = LogsentryConfig::default();
        config.export.output_dir = "  ".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_missing_reports_not_found() {
        let result = LogsentryConfig::from_file("/nonexistent/logsentry.toml");
        assert!(matches!(
            result,
            Err(LogsentryError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    #[serial]
    fn load_or_default_without_file_uses_defaults() {
        let config = LogsentryConfig::load_or_default("/nonexistent/logsentry.toml").unwrap();
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    #[serial]
    fn env_override_applies() {
        // SAFETY: serial 테스트에서만 환경변수를 변경
        unsafe {
            std::env::set_var("LOGSENTRY_REPORT_TOP_IPS", "25");
            std::env::set_var("LOGSENTRY_REPORT_COLOR", "false");
        }
        let mut config = LogsentryConfig::default();
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("LOGSENTRY_REPORT_TOP_IPS");
            std::env::remove_var("LOGSENTRY_REPORT_COLOR");
        }
        assert_eq!(config.report.top_ips, 25);
        assert!(!config.report.color);
    }

    #[test]
    #[serial]
    fn env_override_ignores_unparsable_number() {
        // SAFETY: serial 테스트에서만 환경변수를 변경
        unsafe {
            std::env::set_var("LOGSENTRY_ANALYSIS_BRUTE_FORCE_THRESHOLD", "lots");
        }
        let mut config = LogsentryConfig::default();
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("LOGSENTRY_ANALYSIS_BRUTE_FORCE_THRESHOLD");
        }
        assert_eq!(config.analysis.brute_force_threshold, 50);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = LogsentryConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = LogsentryConfig::parse(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
