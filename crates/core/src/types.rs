//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 파서, 집계기, 탐지기, 리포터가 모두 이 타입들로 데이터를 교환합니다.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 여러 요청을 요약하는 위협에서 URL 자리에 들어가는 값
pub const MULTIPLE_URLS: &str = "Multiple";

/// 접근 로그 엔트리
///
/// combined 형식 접근 로그 한 줄을 파싱한 결과입니다.
/// 생성 이후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 클라이언트 IP (주소 형식 검증 없음)
    pub ip: String,
    /// 요청 시각 (원본 타임존 오프셋 유지)
    pub timestamp: DateTime<FixedOffset>,
    /// HTTP 메서드
    pub method: String,
    /// 요청 대상 (쿼리 문자열 포함)
    pub url: String,
    /// 응답 상태 코드
    pub status: u16,
    /// 응답 크기 (바이트, `-`는 0)
    pub size: u64,
    /// Referer 헤더
    pub referer: String,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl LogEntry {
    /// IP, 메서드가 비어있지 않고 상태 코드가 양수이면 유효합니다.
    pub fn is_valid(&self) -> bool {
        !self.ip.is_empty() && !self.method.is_empty() && self.status > 0
    }

    /// 상태 코드 분류를 반환합니다.
    pub fn status_class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {} ({} bytes)",
            self.ip, self.method, self.url, self.status, self.size,
        )
    }
}

/// HTTP 상태 코드 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// 1xx 및 범위 밖의 코드
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Redirect,
    /// 4xx
    ClientError,
    /// 5xx 이상
    ServerError,
}

impl StatusClass {
    /// 상태 코드로부터 분류를 계산합니다.
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            300..=399 => Self::Redirect,
            400..=499 => Self::ClientError,
            500.. => Self::ServerError,
            _ => Self::Informational,
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Informational => write!(f, "Informational"),
            Self::Success => write!(f, "Success"),
            Self::Redirect => write!(f, "Redirect"),
            Self::ClientError => write!(f, "Client Error"),
            Self::ServerError => write!(f, "Server Error"),
        }
    }
}

/// 탐지된 보안 위협
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityThreat {
    /// 위협 유형
    #[serde(rename = "type")]
    pub kind: ThreatKind,
    /// 출발지 IP
    pub ip: String,
    /// 관련 URL (집계형 위협은 [`MULTIPLE_URLS`])
    pub url: String,
    /// 위협 시각
    pub timestamp: DateTime<FixedOffset>,
    /// 심각도
    pub severity: Severity,
    /// 사람이 읽을 수 있는 설명
    pub description: String,
}

impl fmt::Display for SecurityThreat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} from {} on {}",
            self.severity, self.kind, self.ip, self.url,
        )
    }
}

/// 위협 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatKind {
    /// SQL 인젝션 시도
    SqlInjection,
    /// Cross-Site Scripting 시도
    Xss,
    /// 디렉토리 트래버설 / 로컬 파일 포함
    DirectoryTraversal,
    /// 스캐너/악성 봇 User-Agent
    SuspiciousBot,
    /// 민감 경로에서의 인증 실패
    AuthFailure,
    /// 짧은 시간 내 대량 요청 (무차별 대입)
    BruteForce,
    /// 매우 짧은 시간 내 폭주 요청
    DdosAttempt,
}

impl ThreatKind {
    /// 모든 위협 유형 (탐지 순서)
    pub const ALL: [ThreatKind; 7] = [
        Self::SqlInjection,
        Self::Xss,
        Self::DirectoryTraversal,
        Self::SuspiciousBot,
        Self::AuthFailure,
        Self::BruteForce,
        Self::DdosAttempt,
    ];

    /// 직렬화/리포트에서 사용하는 태그 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SqlInjection => "SQL_INJECTION",
            Self::Xss => "XSS",
            Self::DirectoryTraversal => "DIRECTORY_TRAVERSAL",
            Self::SuspiciousBot => "SUSPICIOUS_BOT",
            Self::AuthFailure => "AUTH_FAILURE",
            Self::BruteForce => "BRUTE_FORCE",
            Self::DdosAttempt => "DDOS_ATTEMPT",
        }
    }
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 심각도 레벨
///
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Low < Medium < High`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// 낮은 심각도
    #[default]
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도: 즉시 대응 필요
    High,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// 관측된 시간 범위 (양 끝 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// 가장 이른 타임스탬프
    pub start: DateTime<FixedOffset>,
    /// 가장 늦은 타임스탬프
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    /// 단일 시각으로 범위를 시작합니다.
    pub fn at(ts: DateTime<FixedOffset>) -> Self {
        Self { start: ts, end: ts }
    }

    /// 범위를 시각 하나만큼 넓힙니다.
    pub fn extend(&mut self, ts: DateTime<FixedOffset>) {
        if ts < self.start {
            self.start = ts;
        }
        if ts > self.end {
            self.end = ts;
        }
    }

    /// 범위의 길이
    pub fn duration(&self) -> chrono::TimeDelta {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn sample_entry() -> LogEntry {
        LogEntry {
            ip: "10.0.0.1".to_owned(),
            timestamp: ts("2025-09-13T21:00:01+02:00"),
            method: "GET".to_owned(),
            url: "/index.html".to_owned(),
            status: 200,
            size: 512,
            referer: String::new(),
            user_agent: "Mozilla/5.0".to_owned(),
        }
    }

    #[test]
    fn valid_entry() {
        assert!(sample_entry().is_valid());
    }

    #[test]
    fn empty_ip_is_invalid() {
        let mut entry = sample_entry();
        entry.ip = String::new();
        assert!(!entry.is_valid());
    }

    #[test]
    fn empty_method_is_invalid() {
        let mut entry = sample_entry();
        entry.method = String::new();
        assert!(!entry.is_valid());
    }

    #[test]
    fn zero_status_is_invalid() {
        let mut entry = sample_entry();
        entry.status = 0;
        assert!(!entry.is_valid());
    }

    #[test]
    fn status_classes() {
        assert_eq!(StatusClass::of(100), StatusClass::Informational);
        assert_eq!(StatusClass::of(204), StatusClass::Success);
        assert_eq!(StatusClass::of(304), StatusClass::Redirect);
        assert_eq!(StatusClass::of(401), StatusClass::ClientError);
        assert_eq!(StatusClass::of(503), StatusClass::ServerError);
        assert_eq!(StatusClass::of(999), StatusClass::ServerError);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Low.to_string(), "LOW");
        assert_eq!(Severity::Medium.to_string(), "MEDIUM");
        assert_eq!(Severity::High.to_string(), "HIGH");
    }

    #[test]
    fn severity_from_str_loose() {
        assert_eq!(Severity::from_str_loose("HIGH"), Some(Severity::High));
        assert_eq!(Severity::from_str_loose("Med"), Some(Severity::Medium));
        assert_eq!(Severity::from_str_loose("low"), Some(Severity::Low));
        assert_eq!(Severity::from_str_loose("critical"), None);
    }

    #[test]
    fn severity_serializes_uppercase() {
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }

    #[test]
    fn threat_kind_tags_match_serde() {
        for kind in ThreatKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn threat_serializes_kind_as_type() {
        let threat = SecurityThreat {
            kind: ThreatKind::BruteForce,
            ip: "10.0.0.1".to_owned(),
            url: MULTIPLE_URLS.to_owned(),
            timestamp: ts("2025-09-13T21:00:01+02:00"),
            severity: Severity::High,
            description: "test".to_owned(),
        };
        let value = serde_json::to_value(&threat).unwrap();
        assert_eq!(value["type"], "BRUTE_FORCE");
        assert_eq!(value["severity"], "HIGH");
        assert_eq!(value["url"], "Multiple");
    }

    #[test]
    fn time_range_extends_both_ends() {
        let mut range = TimeRange::at(ts("2025-09-13T12:00:00Z"));
        range.extend(ts("2025-09-13T11:00:00Z"));
        range.extend(ts("2025-09-13T13:30:00Z"));
        range.extend(ts("2025-09-13T12:30:00Z"));
        assert_eq!(range.start, ts("2025-09-13T11:00:00Z"));
        assert_eq!(range.end, ts("2025-09-13T13:30:00Z"));
        assert_eq!(range.duration().num_minutes(), 150);
    }

    #[test]
    fn time_range_compares_instants_across_offsets() {
        // 같은 순간을 다른 오프셋으로 표현
        let mut range = TimeRange::at(ts("2025-09-13T12:00:00+02:00"));
        range.extend(ts("2025-09-13T10:30:00Z"));
        assert_eq!(range.end, ts("2025-09-13T10:30:00Z"));
    }
}
