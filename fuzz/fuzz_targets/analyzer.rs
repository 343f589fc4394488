#![no_main]

use arbitrary::Arbitrary;
use chrono::DateTime;
use libfuzzer_sys::fuzz_target;

use logsentry_analyzer::Analyzer;
use logsentry_core::types::LogEntry;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzEntry {
    ip: u8,
    secs: u32,
    method: String,
    url: String,
    status: u16,
    size: u64,
    user_agent: String,
}

fuzz_target!(|input: Vec<FuzzEntry>| {
    let Ok(analyzer) = Analyzer::new() else {
        return;
    };

    // 엔트리 수 제한 (성능)
    let entries: Vec<LogEntry> = input
        .into_iter()
        .take(512)
        .filter_map(|e| {
            let timestamp = DateTime::from_timestamp(i64::from(e.secs), 0)?.fixed_offset();
            Some(LogEntry {
                ip: format!("10.0.0.{}", e.ip),
                timestamp,
                method: e.method,
                url: e.url,
                status: e.status,
                size: e.size,
                referer: "-".to_owned(),
                user_agent: e.user_agent,
            })
        })
        .collect();

    let stats = analyzer.analyze(&entries);
    let valid = entries.iter().filter(|e| e.is_valid()).count() as u64;

    assert_eq!(stats.total_requests, valid);
    assert!(stats.unique_ips <= stats.total_requests);
    assert!((0.0..=100.0).contains(&stats.error_rate));
    assert!(stats.health_score().score <= 100);
});
