//! 분석 결과 내보내기
//!
//! - JSON: [`Statistics`] 전체를 들여쓰기하여 기록
//! - CSV: 위협 목록만 6열 (`Type,IP,URL,Timestamp,Severity,Description`)로 기록
//!
//! 두 함수 모두 출력 디렉토리(`output_dir`)가 없으면 먼저 생성합니다.
//! 대상 파일 경로는 `output_dir`과 무관하게 그대로 사용됩니다.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use logsentry_core::error::{ExportError, IngestError};
use tracing::{info, warn};

use crate::error::AnalyzerError;
use crate::stats::Statistics;

/// CSV 헤더
pub const CSV_HEADER: [&str; 6] = ["Type", "IP", "URL", "Timestamp", "Severity", "Description"];

/// CSV 타임스탬프 형식
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn ensure_output_dir(output_dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(output_dir).map_err(|e| ExportError::CreateDir {
        path: output_dir.display().to_string(),
        reason: e.to_string(),
    })
}

fn create_file(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ExportError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// 분석 결과 전체를 JSON으로 내보냅니다.
pub fn export_json(
    stats: &Statistics,
    path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<(), AnalyzerError> {
    let path = path.as_ref();
    ensure_output_dir(output_dir.as_ref())?;

    let write_err = |reason: String| ExportError::Write {
        path: path.display().to_string(),
        reason,
    };

    let mut writer = create_file(path)?;
    serde_json::to_writer_pretty(&mut writer, stats).map_err(|e| ExportError::Serialize {
        format: "json".to_owned(),
        reason: e.to_string(),
    })?;
    writeln!(writer).map_err(|e| write_err(e.to_string()))?;
    writer.flush().map_err(|e| write_err(e.to_string()))?;

    info!(path = %path.display(), requests = stats.total_requests, "exported json");
    Ok(())
}

/// 위협 목록을 CSV로 내보냅니다.
///
/// 행 단위 쓰기 실패는 경고만 남기고 다음 행으로 넘어갑니다.
pub fn export_csv(
    stats: &Statistics,
    path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<(), AnalyzerError> {
    let path = path.as_ref();
    ensure_output_dir(output_dir.as_ref())?;

    let write_err = |reason: String| ExportError::Write {
        path: path.display().to_string(),
        reason,
    };

    let mut writer = csv::Writer::from_writer(create_file(path)?);
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| write_err(e.to_string()))?;

    let mut written = 0usize;
    for (row, threat) in stats.security_threats.iter().enumerate() {
        let timestamp = threat.timestamp.format(CSV_TIMESTAMP_FORMAT).to_string();
        let severity = threat.severity.to_string();
        let record = [
            threat.kind.as_str(),
            threat.ip.as_str(),
            threat.url.as_str(),
            timestamp.as_str(),
            severity.as_str(),
            threat.description.as_str(),
        ];
        match writer.write_record(record) {
            Ok(()) => written += 1,
            Err(e) => warn!(row, error = %e, "skipping threat row in csv export"),
        }
    }
    writer.flush().map_err(|e| write_err(e.to_string()))?;

    info!(path = %path.display(), rows = written, "exported csv");
    Ok(())
}

/// 내보낸 JSON 파일을 다시 읽어옵니다.
pub fn load_json(path: impl AsRef<Path>) -> Result<Statistics, AnalyzerError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IngestError::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let stats = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        ExportError::Serialize {
            format: "json".to_owned(),
            reason: e.to_string(),
        }
    })?;
    Ok(stats)
}
