#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use logsentry_analyzer::LogIngestor;

fuzz_target!(|data: &[u8]| {
    let Ok(ingestor) = LogIngestor::new() else {
        return;
    };

    // 잘못된 UTF-8, CR/LF 혼합 입력에서도 유효한 엔트리만 반환해야 한다
    if let Ok(entries) = ingestor.ingest_reader(Cursor::new(data)) {
        assert!(entries.iter().all(|entry| entry.is_valid()));
    }
});
