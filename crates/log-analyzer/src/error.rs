//! 분석 엔진 에러 타입
//!
//! [`AnalyzerError`]는 분석 엔진 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<AnalyzerError> for LogsentryError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logsentry_core::error::{ExportError, IngestError, LogsentryError, ParseError};

/// 분석 엔진 도메인 에러
///
/// 파싱, 파일 수집, 시그니처 컴파일, 내보내기 등 엔진 내부의
/// 모든 에러 상황을 포괄합니다.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 라인 파싱 실패 (호출자가 라인을 건너뛰어 복구)
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// 파일 수집 실패 (치명적)
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// 결과 내보내기 실패
    #[error(transparent)]
    Export(#[from] ExportError),

    /// 탐지 시그니처 컴파일 실패
    #[error("signature error: {kind}: {reason}")]
    Signature {
        /// 시그니처의 위협 유형
        kind: String,
        /// 실패 사유
        reason: String,
    },

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<AnalyzerError> for LogsentryError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Parse(e) => LogsentryError::Parse(e),
            AnalyzerError::Ingest(e) => LogsentryError::Ingest(e),
            AnalyzerError::Export(e) => LogsentryError::Export(e),
            other => LogsentryError::Io(std::io::Error::other(other.to_string())),
        }
    }
}
