#![no_main]

use libfuzzer_sys::fuzz_target;
use logsentry_analyzer::AccessLogParser;
use logsentry_core::pipeline::LogParser;

fuzz_target!(|data: &[u8]| {
    let Ok(parser) = AccessLogParser::new() else {
        return;
    };
    let line = String::from_utf8_lossy(data);

    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    if let Ok(entry) = parser.parse_line(&line) {
        assert!(!entry.ip.is_empty());
        assert!(!entry.method.is_empty());
    }
});
