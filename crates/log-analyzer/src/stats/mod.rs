//! 통계 집계기
//!
//! 엔트리 목록을 한 번 순회하며 빈도/비율/시간 범위를 집계하고, 같은 순회에서
//! 등록된 [`Detector`]들을 엔트리마다 호출합니다. 순회가 끝나면 IP별 타임스탬프
//! 인덱스를 한 번 정렬한 뒤 무차별 대입/DDoS 휴리스틱을 실행합니다.
//!
//! 위협 순서: 엔트리 순서대로의 엔트리 단위 탐지 결과, 그 다음 무차별 대입,
//! 그 다음 DDoS (각각 IP 오름차순).

mod health;
mod statistics;

pub use health::{HealthGrade, HealthScore};
pub use statistics::{Statistics, top_n};

use std::collections::BTreeSet;

use chrono::Timelike;
use logsentry_core::config::AnalysisConfig;
use logsentry_core::pipeline::Detector;
use logsentry_core::types::{LogEntry, TimeRange};
use tracing::info;

use crate::detect::SignatureDetector;
use crate::detect::behavior::{
    BruteForcePolicy, DdosPolicy, IpTimeline, detect_brute_force, detect_ddos, sort_timeline,
};
use crate::error::AnalyzerError;
use crate::normalize::{normalize_page, normalize_user_agent};

/// 통계 집계기
///
/// 내부 상태를 갖지 않으므로 같은 입력에 대해 항상 같은 [`Statistics`]를 돌려줍니다.
pub struct Analyzer {
    config: AnalysisConfig,
    detectors: Vec<Box<dyn Detector>>,
    brute_force: BruteForcePolicy,
    ddos: DdosPolicy,
}

impl Analyzer {
    /// 기본 설정과 기본 시그니처 탐지기로 집계기를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Self::with_config(AnalysisConfig::default())
    }

    /// 주어진 설정으로 집계기를 생성합니다.
    pub fn with_config(config: AnalysisConfig) -> Result<Self, AnalyzerError> {
        let signatures = SignatureDetector::new()?.with_snippet_len(config.bot_snippet_len);
        Ok(Self {
            brute_force: BruteForcePolicy::from(&config),
            ddos: DdosPolicy::from(&config),
            detectors: vec![Box::new(signatures)],
            config,
        })
    }

    /// 엔트리 단위 탐지기를 추가합니다.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        tracing::debug!(detector = detector.name(), "registered detector");
        self.detectors.push(detector);
    }

    /// 등록된 탐지기 이름 목록
    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// 사용 중인 설정
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 엔트리 목록을 분석합니다.
    ///
    /// 유효하지 않은 엔트리([`LogEntry::is_valid`])는 건너뜁니다.
    /// 이 함수는 실패하지 않습니다.
    pub fn analyze(&self, entries: &[LogEntry]) -> Statistics {
        let mut stats = Statistics::default();
        let mut timeline = IpTimeline::new();
        let mut unique_ips = BTreeSet::new();
        let mut errors: u64 = 0;

        for entry in entries.iter().filter(|e| e.is_valid()) {
            stats.total_requests += 1;

            match stats.time_range.as_mut() {
                Some(range) => range.extend(entry.timestamp),
                None => stats.time_range = Some(TimeRange::at(entry.timestamp)),
            }

            unique_ips.insert(entry.ip.as_str());
            *stats.ip_counts.entry(entry.ip.clone()).or_insert(0) += 1;

            let page = normalize_page(&entry.url, self.config.normalize_max_len);
            *stats.page_counts.entry(page).or_insert(0) += 1;

            let agent = normalize_user_agent(&entry.user_agent, self.config.normalize_max_len);
            *stats.user_agent_counts.entry(agent).or_insert(0) += 1;

            *stats.status_codes.entry(entry.status).or_insert(0) += 1;
            *stats.methods.entry(entry.method.clone()).or_insert(0) += 1;
            *stats
                .hourly_distribution
                .entry(entry.timestamp.hour())
                .or_insert(0) += 1;

            if entry.status >= 400 {
                errors += 1;
            }
            stats.bandwidth_bytes = stats.bandwidth_bytes.saturating_add(entry.size);

            for detector in &self.detectors {
                stats.security_threats.extend(detector.inspect(entry));
            }

            timeline
                .entry(entry.ip.clone())
                .or_default()
                .push(entry.timestamp);
        }

        stats.unique_ips = unique_ips.len() as u64;
        if stats.total_requests > 0 {
            let total = stats.total_requests as f64;
            stats.error_rate = errors as f64 / total * 100.0;
            stats.average_response_size = stats.bandwidth_bytes as f64 / total;
        }

        sort_timeline(&mut timeline);
        stats
            .security_threats
            .extend(detect_brute_force(&timeline, &self.brute_force));
        stats
            .security_threats
            .extend(detect_ddos(&timeline, &self.ddos));

        info!(
            requests = stats.total_requests,
            unique_ips = stats.unique_ips,
            threats = stats.security_threats.len(),
            "analysis complete"
        );
        stats
    }
}
