//! 수집부터 집계까지의 전체 흐름
//!
//! [`AnalysisPipeline`]은 [`LogIngestor`]와 [`Analyzer`]를 설정에 맞게 묶어
//! 파일 하나를 끝까지 처리합니다. 내보내기는 호출자가 결과를 보고 결정합니다.

use std::path::Path;
use std::time::{Duration, Instant};

use logsentry_core::config::LogsentryConfig;
use logsentry_core::types::LogEntry;
use tracing::info;

use crate::error::AnalyzerError;
use crate::ingest::{LogIngestor, StatusClassSummary, status_class_summary};
use crate::stats::{Analyzer, Statistics};

/// 한 번의 분석 실행 결과
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// 수집된 유효 엔트리 (파일 순서)
    pub entries: Vec<LogEntry>,
    /// 집계 결과
    pub statistics: Statistics,
    /// 상태 코드 분류 요약
    pub status_summary: StatusClassSummary,
    /// 수집과 집계에 걸린 시간
    pub elapsed: Duration,
}

impl AnalysisOutcome {
    /// 초당 처리한 엔트리 수
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.entries.len() as f64 / secs)
    }
}

/// 수집기와 집계기를 묶은 분석 파이프라인
pub struct AnalysisPipeline {
    ingestor: LogIngestor,
    analyzer: Analyzer,
}

impl AnalysisPipeline {
    /// 설정으로부터 파이프라인을 구성합니다.
    pub fn from_config(config: &LogsentryConfig) -> Result<Self, AnalyzerError> {
        Ok(Self {
            ingestor: LogIngestor::from_config(&config.ingest)?,
            analyzer: Analyzer::with_config(config.analysis.clone())?,
        })
    }

    /// 집계기에 대한 가변 참조 (탐지기 추가용)
    pub fn analyzer_mut(&mut self) -> &mut Analyzer {
        &mut self.analyzer
    }

    /// 파일 하나를 수집하고 분석합니다.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<AnalysisOutcome, AnalyzerError> {
        let path = path.as_ref();
        let started = Instant::now();

        let entries = self.ingestor.ingest_file(path)?;
        let status_summary = status_class_summary(&entries);
        let statistics = self.analyzer.analyze(&entries);
        let elapsed = started.elapsed();

        info!(
            path = %path.display(),
            entries = entries.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "pipeline finished"
        );

        Ok(AnalysisOutcome {
            entries,
            statistics,
            status_summary,
            elapsed,
        })
    }
}
