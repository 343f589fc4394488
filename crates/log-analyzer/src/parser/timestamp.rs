//! 접근 로그 타임스탬프 파싱
//!
//! 아래 레이아웃을 순서대로 시도하고, 처음 성공한 결과를 사용합니다.
//!
//! | 순서 | 레이아웃 | 예시 |
//! |------|----------|------|
//! | 1 | `%d/%b/%Y:%H:%M:%S %z` | `13/Sep/2025:21:00:01 +0200` |
//! | 2 | `%d/%b/%Y:%H:%M:%S` | `13/Sep/2025:21:00:01` (UTC) |
//! | 3 | `%Y-%m-%d %H:%M:%S` | `2025-09-13 21:00:01` (UTC) |
//! | 4 | `%Y/%m/%d %H:%M:%S` | `2025/09/13 21:00:01` (UTC) |
//!
//! 오프셋이 없는 레이아웃은 UTC로 해석합니다.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};

enum Layout {
    /// 오프셋을 포함하는 레이아웃
    Zoned(&'static str),
    /// 오프셋이 없는 레이아웃 (UTC로 해석)
    Naive(&'static str),
}

const LAYOUTS: [Layout; 4] = [
    Layout::Zoned("%d/%b/%Y:%H:%M:%S %z"),
    Layout::Naive("%d/%b/%Y:%H:%M:%S"),
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
    Layout::Naive("%Y/%m/%d %H:%M:%S"),
];

/// 타임스탬프 문자열을 파싱합니다.
///
/// 어떤 레이아웃에도 맞지 않으면 `None`을 반환합니다.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    LAYOUTS.iter().find_map(|layout| match layout {
        Layout::Zoned(fmt) => DateTime::parse_from_str(raw, fmt).ok(),
        Layout::Naive(fmt) => NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset()),
    })
}

/// 타임스탬프를 파싱하고, 실패하면 현재 로컬 시각으로 대체합니다.
///
/// 대체가 일어나면 해당 엔트리의 시간 정보는 의미를 잃습니다
/// (시간 범위, 시간대 분포, 행위 기반 탐지에 영향).
pub fn parse_timestamp_or_now(raw: &str) -> DateTime<FixedOffset> {
    parse_timestamp(raw).unwrap_or_else(|| {
        tracing::debug!(raw, "unrecognized timestamp, substituting current time");
        Local::now().fixed_offset()
    })
}
