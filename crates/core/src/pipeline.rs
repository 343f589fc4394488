//! 파이프라인 trait: 모듈 확장 포인트 정의

use crate::error::ParseError;
use crate::types::{LogEntry, SecurityThreat};

/// 로그 파서 trait
///
/// 새로운 로그 형식을 지원하려면 이 trait을 구현합니다.
pub trait LogParser {
    /// 지원하는 로그 형식 이름
    fn format_name(&self) -> &str;

    /// 원시 라인 하나를 로그 엔트리로 파싱
    fn parse_line(&self, line: &str) -> Result<LogEntry, ParseError>;
}

/// 엔트리 단위 탐지 로직을 구현하는 trait
///
/// 탐지기는 실패하지 않습니다. 매칭이 없으면 빈 목록을 반환합니다.
pub trait Detector {
    /// 탐지기 이름
    fn name(&self) -> &str;

    /// 엔트리 하나를 검사하여 탐지된 위협을 반환
    fn inspect(&self, entry: &LogEntry) -> Vec<SecurityThreat>;
}
