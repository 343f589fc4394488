//! 위협 탐지 -- 시그니처 테이블과 행위 기반 휴리스틱
//!
//! # 엔트리 단위 탐지
//! [`SIGNATURES`] 테이블의 각 시그니처는 독립적으로 평가되며, 한 엔트리가
//! 여러 시그니처에 동시에 매칭될 수 있습니다. 패턴은 대소문자를 무시하고
//! 원본 필드 값에 대해 부분 매칭합니다. URL 디코딩은 하지 않습니다.
//!
//! # 데이터셋 단위 탐지
//! [`behavior`] 모듈의 무차별 대입/DDoS 휴리스틱은 IP별 타임스탬프 인덱스를
//! 대상으로 엔트리 단위 탐지가 끝난 뒤 한 번 실행됩니다.

pub mod behavior;

use std::fmt;

use logsentry_core::pipeline::Detector;
use logsentry_core::types::{LogEntry, SecurityThreat, Severity, ThreatKind};
use regex::{Regex, RegexBuilder};

use crate::error::AnalyzerError;
use crate::normalize::truncate_with_ellipsis;

/// 봇 탐지 설명에 포함되는 User-Agent 조각의 기본 길이
pub const DEFAULT_SNIPPET_LEN: usize = 50;

/// 시그니처가 검사하는 엔트리 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// 요청 대상 (쿼리 문자열 포함)
    Url,
    /// User-Agent 헤더
    UserAgent,
}

impl Field {
    fn extract<'a>(&self, entry: &'a LogEntry) -> &'a str {
        match self {
            Self::Url => &entry.url,
            Self::UserAgent => &entry.user_agent,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => write!(f, "url"),
            Self::UserAgent => write!(f, "user_agent"),
        }
    }
}

/// 위협 설명 템플릿
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Description {
    /// 고정 문자열
    Fixed(&'static str),
    /// 접두어 뒤에 잘린 User-Agent 조각을 붙임
    WithAgentSnippet(&'static str),
}

impl Description {
    /// 엔트리와 무관한 고정 부분
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fixed(text) | Self::WithAgentSnippet(text) => text,
        }
    }
}

/// 선언적 탐지 시그니처
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    /// 위협 유형
    pub kind: ThreatKind,
    /// 심각도
    pub severity: Severity,
    /// 검사 대상 필드 (하나라도 매칭되면 탐지)
    pub fields: &'static [Field],
    /// 대소문자 무시 정규식 패턴
    pub pattern: &'static str,
    /// 지정되면 상태 코드가 정확히 일치해야 함
    pub required_status: Option<u16>,
    /// 설명 템플릿
    pub description: Description,
}

/// 기본 시그니처 테이블 (탐지 순서)
pub const SIGNATURES: [Signature; 5] = [
    Signature {
        kind: ThreatKind::SqlInjection,
        severity: Severity::High,
        fields: &[Field::Url],
        pattern: r"union|select|insert|update|delete|drop|exec|script|alert|onload|information_schema|concat|char\(|0x[0-9a-f]+|sleep\(|benchmark\(",
        required_status: None,
        description: Description::Fixed("SQL injection attempt detected in URL"),
    },
    Signature {
        kind: ThreatKind::Xss,
        severity: Severity::Medium,
        fields: &[Field::Url, Field::UserAgent],
        pattern: r"<script|javascript:|onload=|onerror=|alert\(|prompt\(|confirm\(|eval\(|document\.|window\.|<iframe|<object|<embed",
        required_status: None,
        description: Description::Fixed("Cross-site scripting attempt detected"),
    },
    Signature {
        kind: ThreatKind::DirectoryTraversal,
        severity: Severity::High,
        fields: &[Field::Url],
        pattern: r"\.\./|\.\.\\|/etc/|/proc/|/var/|/usr/|/bin/|/sbin/|/root/|/home/|\.htaccess|\.htpasswd|config\.php|phpinfo|web\.config",
        required_status: None,
        description: Description::Fixed("Directory traversal or local file inclusion attempt detected"),
    },
    Signature {
        kind: ThreatKind::SuspiciousBot,
        severity: Severity::Medium,
        fields: &[Field::UserAgent],
        pattern: r"bot|crawler|scanner|exploit|hack|injection|nikto|sqlmap|nmap|masscan|zmap|dirb|gobuster|wfuzz|burp|owasp",
        required_status: None,
        description: Description::WithAgentSnippet("Suspicious bot/scanner detected"),
    },
    Signature {
        kind: ThreatKind::AuthFailure,
        severity: Severity::Low,
        fields: &[Field::Url],
        pattern: r"wp-login|admin|login|auth|signin|password|pwd",
        required_status: Some(401),
        description: Description::Fixed("Authentication failure on sensitive page"),
    },
];

/// 기본 시그니처 테이블을 반환합니다.
pub fn signatures() -> &'static [Signature] {
    &SIGNATURES
}

struct CompiledSignature {
    signature: &'static Signature,
    regex: Regex,
}

/// 시그니처 기반 엔트리 탐지기
///
/// 정규식은 생성 시 한 번만 컴파일합니다.
pub struct SignatureDetector {
    rules: Vec<CompiledSignature>,
    snippet_len: usize,
}

impl SignatureDetector {
    /// 기본 시그니처 테이블로 탐지기를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Self::from_signatures(signatures())
    }

    /// 주어진 시그니처 목록으로 탐지기를 생성합니다.
    pub fn from_signatures(signatures: &'static [Signature]) -> Result<Self, AnalyzerError> {
        let rules = signatures
            .iter()
            .map(|signature| {
                RegexBuilder::new(signature.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|regex| CompiledSignature { signature, regex })
                    .map_err(|e| AnalyzerError::Signature {
                        kind: signature.kind.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            snippet_len: DEFAULT_SNIPPET_LEN,
        })
    }

    /// 봇 탐지 설명에 포함할 User-Agent 조각 길이를 설정합니다.
    pub fn with_snippet_len(mut self, len: usize) -> Self {
        self.snippet_len = len;
        self
    }

    /// 로드된 시그니처 수
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn describe(&self, description: Description, entry: &LogEntry) -> String {
        match description {
            Description::Fixed(text) => text.to_owned(),
            Description::WithAgentSnippet(prefix) => format!(
                "{prefix}: {}",
                truncate_with_ellipsis(&entry.user_agent, self.snippet_len)
            ),
        }
    }
}

impl Detector for SignatureDetector {
    fn name(&self) -> &str {
        "signature"
    }

    fn inspect(&self, entry: &LogEntry) -> Vec<SecurityThreat> {
        self.rules
            .iter()
            .filter(|rule| {
                rule.signature
                    .required_status
                    .is_none_or(|status| entry.status == status)
            })
            .filter(|rule| {
                rule.signature
                    .fields
                    .iter()
                    .any(|field| rule.regex.is_match(field.extract(entry)))
            })
            .map(|rule| SecurityThreat {
                kind: rule.signature.kind,
                ip: entry.ip.clone(),
                url: entry.url.clone(),
                timestamp: entry.timestamp,
                severity: rule.signature.severity,
                description: self.describe(rule.signature.description, entry),
            })
            .collect()
    }
}
