//! 에러 타입: 도메인별 에러 정의
//!
//! 라인 단위 파싱 에러([`ParseError`])는 호출자가 해당 라인을 건너뛰는 것으로
//! 복구합니다. 파일 열기/읽기 실패([`IngestError`])는 수집 단계 전체를 중단시킵니다.
//! 내보내기 실패([`ExportError`])는 상위에서 경고로 보고됩니다.

/// logsentry 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogsentryError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 라인 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 로그 파일 수집 에러
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// 결과 내보내기 에러
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 라인 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// 문법 불일치 (필드 누락, 따옴표/대괄호 누락 등)
    #[error("malformed line: {reason}")]
    MalformedLine { reason: String },

    /// 상태 코드가 정수가 아님
    #[error("invalid status code: '{value}'")]
    InvalidStatus { value: String },
}

/// 로그 파일 수집 에러
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// 입력 파일이 존재하지 않음
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// 입력 경로가 디렉토리임
    #[error("'{path}' is a directory, not a file")]
    IsDirectory { path: String },

    /// 파일 열기/읽기 실패
    #[error("failed to read {path}: {reason}")]
    FileRead { path: String, reason: String },
}

/// 결과 내보내기 에러
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// 출력 디렉토리 생성 실패
    #[error("failed to create output directory {path}: {reason}")]
    CreateDir { path: String, reason: String },

    /// 출력 파일 쓰기 실패
    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    /// 직렬화 실패
    #[error("failed to serialize {format}: {reason}")]
    Serialize { format: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_line_display() {
        let err = ParseError::MalformedLine {
            reason: "expected 8 fields".to_owned(),
        };
        assert!(err.to_string().contains("malformed line"));
        assert!(err.to_string().contains("expected 8 fields"));
    }

    #[test]
    fn invalid_status_display() {
        let err = ParseError::InvalidStatus {
            value: "99999999999".to_owned(),
        };
        assert!(err.to_string().contains("99999999999"));
    }

    #[test]
    fn parse_error_converts_to_top_level() {
        let err: LogsentryError = ParseError::MalformedLine {
            reason: "x".to_owned(),
        }
        .into();
        assert!(matches!(err, LogsentryError::Parse(_)));
    }

    #[test]
    fn ingest_error_display() {
        let err = IngestError::IsDirectory {
            path: "/var/log".to_owned(),
        };
        assert!(err.to_string().contains("/var/log"));
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LogsentryError = io_err.into();
        assert!(matches!(err, LogsentryError::Io(_)));
    }
}
