//! 지표 계산을 위한 Decimal 유틸리티.
//!
//! 시세, 밸류에이션 지표, 퍼센트 값은 모두 `Decimal`로 다룹니다.
//! 외부 API가 `f64`로 내려주는 값은 이 모듈의 헬퍼로 변환합니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// 가격 타입.
pub type Price = Decimal;

/// 퍼센트 타입 (5.25 = 5.25%).
pub type Percentage = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 소수점 둘째 자리로 반올림합니다 (0.5는 0에서 먼 쪽으로).
    fn round2(&self) -> Decimal;

    /// 화면 표시용 `f64` 변환 (실패 시 0.0).
    fn to_f64_lossy(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn round2(&self) -> Decimal {
        self.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

/// `f64` 값을 Decimal로 변환합니다.
///
/// NaN/무한대 등 표현할 수 없는 값은 `None`.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    // Display는 최단 표현을 내므로 0.1 같은 값이 0.1000000000000000055로 늘어나지 않음
    Decimal::from_str(&value.to_string()).ok()
}

/// 누락 값을 0으로 대체하는 변환.
///
/// 외부 데이터에서 "제공되지 않음"은 0 센티널로 표현합니다.
pub fn decimal_or_zero(value: Option<f64>) -> Decimal {
    value.and_then(decimal_from_f64).unwrap_or(Decimal::ZERO)
}
