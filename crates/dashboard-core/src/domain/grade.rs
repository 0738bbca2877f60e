//! 투자 등급과 필터 기준.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DashboardError, DashboardResult};

/// 분류기가 부여하는 5단계 투자 등급.
///
/// 선언 순서가 서열입니다: `Watch < Buy < ... < StrongStrongBuy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grade {
    /// 관망
    Watch,
    /// 매수
    Buy,
    /// 적극 매수
    AggressiveBuy,
    /// 초적극 매수
    StrongBuy,
    /// 초초적극 매수
    StrongStrongBuy,
}

impl Grade {
    /// 모든 등급 (높은 등급부터).
    pub const DESCENDING: [Grade; 5] = [
        Grade::StrongStrongBuy,
        Grade::StrongBuy,
        Grade::AggressiveBuy,
        Grade::Buy,
        Grade::Watch,
    ];

    /// 정수 점수를 등급으로 변환합니다. 1~4 이외의 값은 모두 관망입니다.
    pub fn from_points(points: i64) -> Self {
        match points {
            4 => Grade::StrongStrongBuy,
            3 => Grade::StrongBuy,
            2 => Grade::AggressiveBuy,
            1 => Grade::Buy,
            _ => Grade::Watch,
        }
    }

    /// 직렬화 키 (kebab-case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::StrongStrongBuy => "strong-strong-buy",
            Grade::StrongBuy => "strong-buy",
            Grade::AggressiveBuy => "aggressive-buy",
            Grade::Buy => "buy",
            Grade::Watch => "watch",
        }
    }

    /// 화면 표시용 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Grade::StrongStrongBuy => "🔥🔥🔥🔥 초초적극 매수",
            Grade::StrongBuy => "🔥🔥🔥 초적극 매수",
            Grade::AggressiveBuy => "🔥🔥 적극 매수",
            Grade::Buy => "🔥 매수",
            Grade::Watch => "👀 관망",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 사용자 조정 필터 기준.
///
/// 네 개의 임계값은 분류에 사용되고, `size_by_dividend`는 차트 표시에만 쓰입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// PER 최대값
    #[serde(with = "rust_decimal::serde::float")]
    pub max_per: Decimal,
    /// 최소 상승여력 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub min_upside_pct: Decimal,
    /// 최소 하락률 (%), 고점 대비 이 이상 빠졌는지 확인
    #[serde(with = "rust_decimal::serde::float")]
    pub min_drop_pct: Decimal,
    /// 최소 배당률 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub min_dividend_pct: Decimal,
    /// 배당률로 버블 크기 표현 (표시 전용)
    #[serde(default = "default_size_by_dividend")]
    pub size_by_dividend: bool,
}

fn default_size_by_dividend() -> bool {
    true
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_per: dec!(20),
            min_upside_pct: dec!(70),
            min_drop_pct: dec!(30),
            min_dividend_pct: dec!(4.0),
            size_by_dividend: true,
        }
    }
}

impl Thresholds {
    /// 슬라이더 범위 검증 (PER 0~50, 상승여력/하락률 0~100, 배당률 0~10).
    pub fn validate(&self) -> DashboardResult<()> {
        let checks = [
            ("max_per", self.max_per, dec!(50)),
            ("min_upside_pct", self.min_upside_pct, dec!(100)),
            ("min_drop_pct", self.min_drop_pct, dec!(100)),
            ("min_dividend_pct", self.min_dividend_pct, dec!(10)),
        ];
        for (name, value, max) in checks {
            if value < Decimal::ZERO || value > max {
                return Err(DashboardError::InvalidInput(format!(
                    "{} must be within 0..={}, got {}",
                    name, max, value
                )));
            }
        }
        Ok(())
    }
}
