//! 서버 상태 점수
//!
//! 100점에서 시작하여 위협과 에러율만큼 감점합니다.
//!
//! | 항목 | 감점 |
//! |------|------|
//! | HIGH 위협 | 15 |
//! | MEDIUM 위협 | 5 |
//! | LOW 위협 | 1 |
//! | 에러율 > 10% | 에러율의 정수 부분 |
//!
//! 점수는 0 미만으로 내려가지 않습니다.

use std::fmt;

use logsentry_core::types::Severity;
use serde::{Deserialize, Serialize};

use super::Statistics;

const MAX_SCORE: i64 = 100;
const ERROR_RATE_PENALTY_THRESHOLD: f64 = 10.0;

fn penalty(severity: Severity) -> i64 {
    match severity {
        Severity::High => 15,
        Severity::Medium => 5,
        Severity::Low => 1,
    }
}

/// 점수 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthGrade {
    /// 50 미만
    Critical,
    /// 50 이상
    Fair,
    /// 70 이상
    Good,
    /// 85 이상
    Excellent,
}

impl HealthGrade {
    /// 점수로부터 등급을 계산합니다.
    pub fn from_score(score: u32) -> Self {
        match score {
            85.. => Self::Excellent,
            70..=84 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::Critical,
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Fair => write!(f, "Fair"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 상태 점수 (0~100)와 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// 점수
    pub score: u32,
    /// 등급
    pub grade: HealthGrade,
}

impl HealthScore {
    /// 분석 결과로부터 점수를 계산합니다.
    pub fn from_statistics(stats: &Statistics) -> Self {
        let threat_penalty: i64 = stats
            .security_threats
            .iter()
            .map(|t| penalty(t.severity))
            .sum();
        let error_penalty = if stats.error_rate > ERROR_RATE_PENALTY_THRESHOLD {
            stats.error_rate as i64
        } else {
            0
        };

        let score = (MAX_SCORE - threat_penalty - error_penalty).clamp(0, MAX_SCORE);
        let score = u32::try_from(score).unwrap_or(0);
        Self {
            score,
            grade: HealthGrade::from_score(score),
        }
    }
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100 ({})", self.score, self.grade)
    }
}
