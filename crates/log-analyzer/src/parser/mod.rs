//! 접근 로그 파서
//!
//! Apache/Nginx의 combined 형식 접근 로그를 파싱합니다.
//!
//! # Combined 형식
//! ```text
//! IP IDENT USER [TIMESTAMP] "METHOD TARGET PROTOCOL" STATUS SIZE "REFERER" "USER-AGENT"
//! ```
//!
//! IDENT/USER 필드는 무시합니다. 8개 캡처 필드와 대괄호/따옴표 그룹이 모두
//! 있어야 하며, 하나라도 어긋나면 [`ParseError::MalformedLine`]입니다.
//!
//! # 사용 예시
//! ```ignore
//! use logsentry_analyzer::parser::AccessLogParser;
//! use logsentry_core::pipeline::LogParser;
//!
//! let parser = AccessLogParser::new()?;
//! let entry = parser.parse_line(
//!     r#"10.0.0.1 - - [13/Sep/2025:21:00:01 +0200] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0""#,
//! )?;
//! assert_eq!(entry.url, "/index.html");
//! ```

pub mod timestamp;

use logsentry_core::error::ParseError;
use logsentry_core::pipeline::LogParser;
use logsentry_core::types::LogEntry;
use regex::Regex;

use crate::error::AnalyzerError;

pub use timestamp::{parse_timestamp, parse_timestamp_or_now};

/// combined 형식 문법
///
/// 캡처 그룹: 1 IP, 2 타임스탬프, 3 메서드, 4 요청 대상, 5 상태, 6 크기, 7 referer, 8 user agent
const COMBINED_PATTERN: &str =
    r#"^(\S+) \S+ \S+ \[([^\]]+)\] "(\S+) ([^"]*)" (\d+) (\S+) "([^"]*)" "([^"]*)""#;

/// 기본 최대 라인 길이 (바이트)
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// combined 형식 접근 로그 파서
///
/// core의 [`LogParser`] trait을 구현하여 한 줄을 [`LogEntry`]로 변환합니다.
///
/// ## 필드 처리 규칙
/// - IP: 공백이 아닌 토큰이면 그대로 수용 (주소 검증 없음)
/// - 타임스탬프: 4가지 레이아웃을 순서대로 시도, 모두 실패하면 현재 시각
/// - 요청 대상: 마지막 토큰이 `HTTP/`로 시작하면 프로토콜로 보고 제거
/// - 상태: 정수 범위를 넘으면 [`ParseError::InvalidStatus`]
/// - 크기: `-` 또는 숫자가 아니면 0
pub struct AccessLogParser {
    pattern: Regex,
    /// 최대 허용 라인 길이 (바이트)
    max_line_length: usize,
}

impl AccessLogParser {
    /// 기본 설정으로 새 파서를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(COMBINED_PATTERN)?,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        })
    }

    /// 최대 라인 길이를 설정합니다.
    pub fn with_max_line_length(mut self, len: usize) -> Self {
        self.max_line_length = len;
        self
    }

    /// 현재 최대 라인 길이
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn parse_status(raw: &str) -> Result<u16, ParseError> {
        raw.parse::<u16>().map_err(|_| ParseError::InvalidStatus {
            value: raw.to_owned(),
        })
    }

    fn parse_size(raw: &str) -> u64 {
        if raw == "-" {
            return 0;
        }
        raw.parse::<u64>().unwrap_or(0)
    }
}

/// 요청 그룹의 대상 부분에서 후행 프로토콜 토큰을 제거합니다.
fn strip_protocol(target: &str) -> &str {
    match target.rsplit_once(' ') {
        Some((path, proto))
            if proto
                .get(..5)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("HTTP/")) =>
        {
            path
        }
        _ => target,
    }
}

impl LogParser for AccessLogParser {
    fn format_name(&self) -> &str {
        "combined"
    }

    fn parse_line(&self, line: &str) -> Result<LogEntry, ParseError> {
        if line.len() > self.max_line_length {
            return Err(ParseError::MalformedLine {
                reason: format!(
                    "line size {} exceeds maximum {}",
                    line.len(),
                    self.max_line_length
                ),
            });
        }

        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| ParseError::MalformedLine {
                reason: "line does not match combined log format".to_owned(),
            })?;

        // 패턴이 매칭되면 8개 그룹은 모두 존재한다
        let field = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());

        Ok(LogEntry {
            ip: field(1).to_owned(),
            timestamp: parse_timestamp_or_now(field(2)),
            method: field(3).to_owned(),
            url: strip_protocol(field(4)).to_owned(),
            status: Self::parse_status(field(5))?,
            size: Self::parse_size(field(6)),
            referer: field(7).to_owned(),
            user_agent: field(8).to_owned(),
        })
    }
}
