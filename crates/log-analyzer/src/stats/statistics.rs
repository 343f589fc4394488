//! 분석 결과 타입과 조회 헬퍼

use std::cmp::Ordering;
use std::collections::BTreeMap;

use logsentry_core::types::{SecurityThreat, Severity, ThreatKind, TimeRange};
use serde::{Deserialize, Serialize};

use super::health::HealthScore;

/// 로그 파일 하나에 대한 전체 분석 결과
///
/// 모든 빈도 맵은 `BTreeMap`이므로 직렬화/순회 순서가 결정적입니다.
/// 유효한 요청이 0건이면 모든 맵이 비어있고 `time_range`는 `None`입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// 유효한 요청 수
    pub total_requests: u64,
    /// 서로 다른 IP 수
    pub unique_ips: u64,
    /// 상태 코드 400 이상 비율 (0~100)
    pub error_rate: f64,
    /// IP -> 요청 수
    pub ip_counts: BTreeMap<String, u64>,
    /// 정규화된 페이지 -> 조회 수
    pub page_counts: BTreeMap<String, u64>,
    /// 정규화된 User-Agent -> 요청 수
    pub user_agent_counts: BTreeMap<String, u64>,
    /// 상태 코드 -> 응답 수
    pub status_codes: BTreeMap<u16, u64>,
    /// HTTP 메서드 -> 요청 수
    pub methods: BTreeMap<String, u64>,
    /// 탐지된 위협 (탐지 순서)
    pub security_threats: Vec<SecurityThreat>,
    /// 전송된 총 바이트
    pub bandwidth_bytes: u64,
    /// 평균 응답 크기 (바이트)
    pub average_response_size: f64,
    /// 관측된 시간 범위
    pub time_range: Option<TimeRange>,
    /// 시(0~23, 엔트리의 원래 오프셋 기준) -> 요청 수
    pub hourly_distribution: BTreeMap<u32, u64>,
}

/// 빈도 맵에서 상위 `n`개를 고릅니다.
///
/// 개수 내림차순, 같은 개수는 키 오름차순입니다.
pub fn top_n<K: Ord>(counts: &BTreeMap<K, u64>, n: usize) -> Vec<(&K, u64)> {
    let mut items: Vec<(&K, u64)> = counts.iter().map(|(k, v)| (k, *v)).collect();
    // BTreeMap 순회가 이미 키 오름차순이므로 안정 정렬로 충분
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items.truncate(n);
    items
}

impl Statistics {
    /// 요청 수 상위 `n`개 IP
    pub fn top_ips(&self, n: usize) -> Vec<(&str, u64)> {
        top_n(&self.ip_counts, n)
            .into_iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// 조회 수 상위 `n`개 페이지
    pub fn top_pages(&self, n: usize) -> Vec<(&str, u64)> {
        top_n(&self.page_counts, n)
            .into_iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// 요청 수 상위 `n`개 User-Agent
    pub fn top_user_agents(&self, n: usize) -> Vec<(&str, u64)> {
        top_n(&self.user_agent_counts, n)
            .into_iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// 전체 요청 대비 비율 (%)
    pub fn percentage_of(&self, count: u64) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        count as f64 / self.total_requests as f64 * 100.0
    }

    /// 심각도별 위협 수
    pub fn threats_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for threat in &self.security_threats {
            *counts.entry(threat.severity).or_insert(0) += 1;
        }
        counts
    }

    /// 유형별 위협 수
    pub fn threats_by_kind(&self) -> BTreeMap<ThreatKind, usize> {
        let mut counts = BTreeMap::new();
        for threat in &self.security_threats {
            *counts.entry(threat.kind).or_insert(0) += 1;
        }
        counts
    }

    /// 표시용으로 정렬된 위협 목록
    ///
    /// 심각도 내림차순, 같은 심각도에서는 최신 시각 우선, 그 다음 IP와 유형 순입니다.
    pub fn sorted_threats(&self) -> Vec<&SecurityThreat> {
        let mut threats: Vec<&SecurityThreat> = self.security_threats.iter().collect();
        threats.sort_by(|a, b| compare_for_display(a, b));
        threats
    }

    /// 서버 상태 점수
    pub fn health_score(&self) -> HealthScore {
        HealthScore::from_statistics(self)
    }

    /// 유효한 요청이 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.total_requests == 0
    }
}

fn compare_for_display(a: &SecurityThreat, b: &SecurityThreat) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
        .then_with(|| a.ip.cmp(&b.ip))
        .then_with(|| a.kind.cmp(&b.kind))
}
