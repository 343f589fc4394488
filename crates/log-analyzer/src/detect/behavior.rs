//! 행위 기반 탐지 -- 무차별 대입과 DDoS 버스트
//!
//! 두 휴리스틱 모두 IP별로 **정렬된** 타임스탬프 목록([`IpTimeline`])을 입력으로 받습니다.
//! [`sort_timeline`]으로 한 번 정렬한 뒤 두 탐지 함수에 같은 인덱스를 넘깁니다.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeDelta};
use logsentry_core::config::AnalysisConfig;
use logsentry_core::types::{MULTIPLE_URLS, SecurityThreat, Severity, ThreatKind};

/// IP별 요청 타임스탬프 인덱스
pub type IpTimeline = BTreeMap<String, Vec<DateTime<FixedOffset>>>;

/// 행위 기반 탐지 결과의 심각도
pub const BEHAVIOR_SEVERITY: Severity = Severity::High;

/// 무차별 대입 탐지 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BruteForcePolicy {
    /// 검사 대상이 되기 위한 IP별 최소 요청 수
    pub min_requests: usize,
    /// 슬라이딩 윈도우 크기
    pub window: TimeDelta,
    /// 한 윈도우 안에서 탐지로 판정하는 요청 수
    pub threshold: usize,
}

impl Default for BruteForcePolicy {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for BruteForcePolicy {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            min_requests: config.brute_force_min_requests,
            window: delta_from_secs(config.brute_force_window_secs),
            threshold: config.brute_force_threshold,
        }
    }
}

/// DDoS 버스트 탐지 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdosPolicy {
    /// 이 값을 **초과**하는 요청 수부터 검사
    pub min_requests: usize,
    /// 첫 요청과 마지막 요청 사이 간격이 이보다 짧으면 탐지
    pub max_span: TimeDelta,
}

impl Default for DdosPolicy {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for DdosPolicy {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            min_requests: config.ddos_min_requests,
            max_span: delta_from_secs(config.ddos_max_span_secs),
        }
    }
}

fn delta_from_secs(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

/// 각 IP의 타임스탬프를 오름차순으로 정렬합니다.
pub fn sort_timeline(timeline: &mut IpTimeline) {
    for timestamps in timeline.values_mut() {
        timestamps.sort_unstable();
    }
}

/// 사람이 읽기 쉬운 기간 표기 (`1h0m0s`, `9m59s`, `42s`)
pub fn format_span(span: TimeDelta) -> String {
    let total = span.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// 무차별 대입 탐지
///
/// 요청 수가 `min_requests` 이상인 IP에 대해 각 타임스탬프에서 시작하는
/// 윈도우 `[t, t + window)`를 차례로 검사합니다. 처음으로 `threshold` 이상을
/// 담은 윈도우에서 위협 하나를 만들고 해당 IP의 검사를 멈춥니다.
///
/// `timeline`의 각 목록은 정렬되어 있어야 합니다.
pub fn detect_brute_force(timeline: &IpTimeline, policy: &BruteForcePolicy) -> Vec<SecurityThreat> {
    let mut threats = Vec::new();

    for (ip, timestamps) in timeline {
        if timestamps.len() < policy.min_requests {
            continue;
        }

        let mut end = 0;
        for (start, &window_start) in timestamps.iter().enumerate() {
            let window_end = window_start.checked_add_signed(policy.window);
            end = end.max(start);
            while end < timestamps.len() && window_end.is_none_or(|limit| timestamps[end] < limit) {
                end += 1;
            }

            let in_window = end - start;
            if in_window >= policy.threshold {
                threats.push(SecurityThreat {
                    kind: ThreatKind::BruteForce,
                    ip: ip.clone(),
                    url: MULTIPLE_URLS.to_owned(),
                    timestamp: window_start,
                    severity: BEHAVIOR_SEVERITY,
                    description: format!(
                        "Possible brute force attack: {in_window} requests within {}",
                        format_span(policy.window)
                    ),
                });
                break;
            }
        }
    }

    threats
}

/// DDoS 버스트 탐지
///
/// 요청 수가 `min_requests`를 초과하고 첫 요청부터 마지막 요청까지의 간격이
/// `max_span`보다 짧은 IP마다 위협 하나를 만듭니다.
///
/// `timeline`의 각 목록은 정렬되어 있어야 합니다.
pub fn detect_ddos(timeline: &IpTimeline, policy: &DdosPolicy) -> Vec<SecurityThreat> {
    timeline
        .iter()
        .filter(|(_, timestamps)| timestamps.len() > policy.min_requests)
        .filter_map(|(ip, timestamps)| {
            let (first, last) = (timestamps.first()?, timestamps.last()?);
            let span = *last - *first;
            (span < policy.max_span).then(|| SecurityThreat {
                kind: ThreatKind::DdosAttempt,
                ip: ip.clone(),
                url: MULTIPLE_URLS.to_owned(),
                timestamp: *first,
                severity: BEHAVIOR_SEVERITY,
                description: format!(
                    "Possible DDoS attempt: {} requests within {}",
                    timestamps.len(),
                    format_span(span)
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-09-13T10:00:00+02:00").unwrap()
    }

    /// `count`개의 요청을 `step` 간격으로 생성
    fn burst(count: usize, step: TimeDelta) -> Vec<DateTime<FixedOffset>> {
        (0..count).map(|i| base() + step * i as i32).collect()
    }

    fn timeline(entries: &[(&str, Vec<DateTime<FixedOffset>>)]) -> IpTimeline {
        let mut timeline: IpTimeline = entries
            .iter()
            .map(|(ip, ts)| ((*ip).to_owned(), ts.clone()))
            .collect();
        sort_timeline(&mut timeline);
        timeline
    }

    #[test]
    fn default_policies_match_config_defaults() {
        let brute = BruteForcePolicy::default();
        assert_eq!(brute.min_requests, 10);
        assert_eq!(brute.window, TimeDelta::hours(1));
        assert_eq!(brute.threshold, 50);

        let ddos = DdosPolicy::default();
        assert_eq!(ddos.min_requests, 1000);
        assert_eq!(ddos.max_span, TimeDelta::minutes(10));
    }

    #[test]
    fn brute_force_55_requests_in_one_hour_yields_one_threat() {
        let index = timeline(&[("10.0.0.9", burst(55, TimeDelta::seconds(30)))]);
        let threats = detect_brute_force(&index, &BruteForcePolicy::default());
        assert_eq!(threats.len(), 1);

        let threat = &threats[0];
        assert_eq!(threat.kind, ThreatKind::BruteForce);
        assert_eq!(threat.severity, Severity::High);
        assert_eq!(threat.url, MULTIPLE_URLS);
        assert_eq!(threat.timestamp, base());
        assert!(threat.description.contains("55 requests"));
        assert!(threat.description.contains("1h0m0s"));
    }

    #[test]
    fn brute_force_below_threshold() {
        let index = timeline(&[("10.0.0.9", burst(49, TimeDelta::seconds(1)))]);
        assert!(detect_brute_force(&index, &BruteForcePolicy::default()).is_empty());
    }

    #[test]
    fn brute_force_spread_over_many_hours() {
        // 시간당 10건씩 10시간
        let index = timeline(&[("10.0.0.9", burst(100, TimeDelta::minutes(6)))]);
        assert!(detect_brute_force(&index, &BruteForcePolicy::default()).is_empty());
    }

    #[test]
    fn brute_force_window_end_is_exclusive() {
        // 50번째 요청이 정확히 window 경계에 위치
        let mut ts = burst(49, TimeDelta::seconds(1));
        ts.push(base() + TimeDelta::hours(1));
        let index = timeline(&[("10.0.0.9", ts)]);
        assert!(detect_brute_force(&index, &BruteForcePolicy::default()).is_empty());
    }

    #[test]
    fn brute_force_reports_first_qualifying_window() {
        // 처음 한 시간은 조용하고, 이후 60건이 몰림
        let mut ts = burst(5, TimeDelta::minutes(20));
        let late = base() + TimeDelta::hours(5);
        ts.extend((0..60).map(|i| late + TimeDelta::seconds(i)));
        let index = timeline(&[("10.0.0.9", ts)]);

        let threats = detect_brute_force(&index, &BruteForcePolicy::default());
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].timestamp, late);
        assert!(threats[0].description.contains("60 requests"));
    }

    #[test]
    fn brute_force_sorts_unordered_input() {
        let mut ts = burst(55, TimeDelta::seconds(10));
        ts.reverse();
        let index = timeline(&[("10.0.0.9", ts)]);
        let threats = detect_brute_force(&index, &BruteForcePolicy::default());
        assert_eq!(threats[0].timestamp, base());
    }

    #[test]
    fn brute_force_respects_min_requests() {
        let policy = BruteForcePolicy {
            min_requests: 10,
            window: TimeDelta::hours(1),
            threshold: 3,
        };
        let index = timeline(&[
            ("10.0.0.1", burst(9, TimeDelta::seconds(1))),
            ("10.0.0.2", burst(10, TimeDelta::seconds(1))),
        ]);
        let threats = detect_brute_force(&index, &policy);
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].ip, "10.0.0.2");
    }

    #[test]
    fn brute_force_one_threat_per_ip_in_ip_order() {
        let index = timeline(&[
            ("10.0.0.2", burst(60, TimeDelta::seconds(1))),
            ("10.0.0.1", burst(60, TimeDelta::seconds(1))),
        ]);
        let threats = detect_brute_force(&index, &BruteForcePolicy::default());
        let ips: Vec<&str> = threats.iter().map(|t| t.ip.as_str()).collect();
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn ddos_burst_detected() {
        let index = timeline(&[("198.51.100.1", burst(1001, TimeDelta::milliseconds(100)))]);
        let threats = detect_ddos(&index, &DdosPolicy::default());
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].kind, ThreatKind::DdosAttempt);
        assert_eq!(threats[0].timestamp, base());
        assert_eq!(threats[0].url, MULTIPLE_URLS);
        assert!(threats[0].description.contains("1001 requests"));
        assert!(threats[0].description.contains("1m40s"));
    }

    #[test]
    fn ddos_requires_strictly_more_than_min() {
        let index = timeline(&[("198.51.100.1", burst(1000, TimeDelta::milliseconds(10)))]);
        assert!(detect_ddos(&index, &DdosPolicy::default()).is_empty());
    }

    #[test]
    fn ddos_span_must_be_short() {
        // 1001건이 약 16분에 걸쳐 분산
        let index = timeline(&[("198.51.100.1", burst(1001, TimeDelta::seconds(1)))]);
        assert!(detect_ddos(&index, &DdosPolicy::default()).is_empty());
    }

    #[test]
    fn empty_timeline_yields_nothing() {
        let index = IpTimeline::new();
        assert!(detect_brute_force(&index, &BruteForcePolicy::default()).is_empty());
        assert!(detect_ddos(&index, &DdosPolicy::default()).is_empty());
    }

    #[test]
    fn huge_window_does_not_overflow() {
        let policy = BruteForcePolicy {
            min_requests: 1,
            window: delta_from_secs(u64::MAX),
            threshold: 2,
        };
        let index = timeline(&[("10.0.0.1", burst(2, TimeDelta::days(365)))]);
        assert_eq!(detect_brute_force(&index, &policy).len(), 1);
    }

    #[test]
    fn span_formatting() {
        assert_eq!(format_span(TimeDelta::hours(1)), "1h0m0s");
        assert_eq!(format_span(TimeDelta::seconds(599)), "9m59s");
        assert_eq!(format_span(TimeDelta::seconds(42)), "42s");
        assert_eq!(format_span(TimeDelta::zero()), "0s");
        assert_eq!(format_span(TimeDelta::seconds(-5)), "0s");
    }
}
