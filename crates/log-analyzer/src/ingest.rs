//! 파일 수집기
//!
//! 로그 파일을 한 줄씩 읽어 파서에 넘기고, 유효한 엔트리만 파일 순서대로 모읍니다.
//!
//! - 줄 구분자: `\n`, `\r\n`, 단독 `\r` 모두 허용
//! - 빈 줄/공백뿐인 줄은 파싱을 시도하지 않음
//! - 파싱 실패 또는 [`LogEntry::is_valid`]를 만족하지 않는 엔트리는 조용히 버림
//! - 파일 열기/읽기 실패만 치명적 에러로 전파
//! - 잘못된 UTF-8 바이트는 대체 문자로 디코딩

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use logsentry_core::config::IngestConfig;
use logsentry_core::error::IngestError;
use logsentry_core::pipeline::LogParser;
use logsentry_core::types::{LogEntry, StatusClass};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AnalyzerError;
use crate::parser::AccessLogParser;

/// 리더 기반 수집에서 에러 메시지에 쓰이는 소스 이름
const READER_SOURCE: &str = "<reader>";

/// 로그 파일 수집기
///
/// 기본 파서는 [`AccessLogParser`]이며, [`LogParser`]를 구현한 어떤 파서든
/// [`LogIngestor::with_parser`]로 주입할 수 있습니다.
pub struct LogIngestor<P: LogParser = AccessLogParser> {
    parser: P,
}

impl LogIngestor<AccessLogParser> {
    /// 기본 combined 파서를 사용하는 수집기를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self::with_parser(AccessLogParser::new()?))
    }

    /// 설정에 따라 수집기를 생성합니다.
    pub fn from_config(config: &IngestConfig) -> Result<Self, AnalyzerError> {
        let parser = AccessLogParser::new()?.with_max_line_length(config.max_line_length);
        Ok(Self::with_parser(parser))
    }
}

impl<P: LogParser> LogIngestor<P> {
    /// 주어진 파서로 수집기를 생성합니다.
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// 사용 중인 파서
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// 파일을 읽어 유효한 엔트리 목록을 반환합니다.
    ///
    /// # Errors
    /// - [`IngestError::FileNotFound`]: 경로가 존재하지 않음
    /// - [`IngestError::IsDirectory`]: 경로가 디렉토리
    /// - [`IngestError::FileRead`]: 열기 또는 읽기 중 I/O 실패
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> Result<Vec<LogEntry>, AnalyzerError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IngestError::FileNotFound {
                path: display.clone(),
            },
            _ => IngestError::FileRead {
                path: display.clone(),
                reason: e.to_string(),
            },
        })?;
        if metadata.is_dir() {
            return Err(IngestError::IsDirectory { path: display }.into());
        }

        let file = File::open(path).map_err(|e| IngestError::FileRead {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        self.read_entries(BufReader::new(file), &display)
    }

    /// 임의의 버퍼 리더에서 엔트리를 수집합니다.
    pub fn ingest_reader<R: BufRead>(&self, reader: R) -> Result<Vec<LogEntry>, AnalyzerError> {
        self.read_entries(reader, READER_SOURCE)
    }

    fn read_entries<R: BufRead>(
        &self,
        mut reader: R,
        source: &str,
    ) -> Result<Vec<LogEntry>, AnalyzerError> {
        let mut entries = Vec::new();
        let mut buf = Vec::new();
        let mut line_no: usize = 0;
        let mut skipped: usize = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| IngestError::FileRead {
                    path: source.to_owned(),
                    reason: e.to_string(),
                })?;
            if read == 0 {
                break;
            }

            let chunk = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            // CRLF의 `\r`은 빈 조각이 되고, 단독 `\r`은 줄 구분자로 취급
            for raw in chunk.split(|&b| b == b'\r') {
                if raw.is_empty() {
                    continue;
                }
                line_no += 1;

                let line = String::from_utf8_lossy(raw);
                if line.trim().is_empty() {
                    continue;
                }

                match self.parser.parse_line(&line) {
                    Ok(entry) if entry.is_valid() => entries.push(entry),
                    Ok(_) => {
                        skipped += 1;
                        debug!(source, line = line_no, "skipping entry that fails validity check");
                    }
                    Err(e) => {
                        skipped += 1;
                        debug!(source, line = line_no, error = %e, "skipping unparsable line");
                    }
                }
            }
        }

        info!(
            source,
            format = self.parser.format_name(),
            entries = entries.len(),
            skipped,
            "ingestion complete"
        );
        Ok(entries)
    }
}

/// 상태 코드 분류별 엔트리 수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusClassSummary {
    /// 전체 엔트리 수
    pub total: usize,
    /// 2xx
    pub success: usize,
    /// 3xx
    pub redirect: usize,
    /// 4xx
    pub client_error: usize,
    /// 5xx 이상
    pub server_error: usize,
}

/// 수집된 엔트리의 상태 코드 분류 요약을 계산합니다.
///
/// 1xx는 `total`에만 포함됩니다.
pub fn status_class_summary(entries: &[LogEntry]) -> StatusClassSummary {
    entries
        .iter()
        .fold(StatusClassSummary::default(), |mut summary, entry| {
            summary.total += 1;
            match entry.status_class() {
                StatusClass::Success => summary.success += 1,
                StatusClass::Redirect => summary.redirect += 1,
                StatusClass::ClientError => summary.client_error += 1,
                StatusClass::ServerError => summary.server_error += 1,
                StatusClass::Informational => {}
            }
            summary
        })
}
