#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: combined 형식 접근 로그 파서와 타임스탬프 레이아웃
//! - [`ingest`]: 파일/리더에서 유효한 엔트리 수집, 상태 코드 분류 요약
//! - [`stats`]: 단일 순회 통계 집계, 상위 N 조회, 상태 점수
//! - [`detect`]: 시그니처 테이블 기반 엔트리 탐지와 행위 기반 휴리스틱
//! - [`export`]: JSON/CSV 내보내기
//! - [`pipeline`]: 수집부터 집계까지 묶은 실행 단위
//! - [`normalize`]: 페이지/User-Agent 정규화
//! - [`error`]: 도메인 에러 타입

pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;

pub mod detect;
pub mod ingest;
pub mod parser;
pub mod stats;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};

// 에러
pub use error::AnalyzerError;

// 파서
pub use parser::AccessLogParser;

// 수집기
pub use ingest::{LogIngestor, StatusClassSummary, status_class_summary};

// 집계
pub use stats::{Analyzer, HealthGrade, HealthScore, Statistics};

// 탐지
pub use detect::{SIGNATURES, Signature, SignatureDetector, signatures};

// 내보내기
pub use export::{export_csv, export_json, load_json};
