//! 52주 범위 기반 파생 지표.
//!
//! - 고점 대비 (%) = `(현재가 / 52주 고가 - 1) * 100`
//! - 상승여력 (%) = `(52주 고가 - 현재가) / (52주 고가 - 52주 저가) * 100`
//!
//! 두 값 모두 소수점 둘째 자리로 반올림하고, 범위를 제한하지 않습니다.
//! 분모가 0이면 0을 반환합니다.

use dashboard_core::{DecimalExt, Percentage, Price};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 52주 고가 대비 현재가 위치 (%). 고점이면 0, 고점 아래면 음수.
pub fn drop_from_high_pct(price: Price, high52: Price) -> Percentage {
    if high52.is_zero() {
        return Decimal::ZERO;
    }
    ((price / high52 - Decimal::ONE) * dec!(100)).round2()
}

/// 52주 범위에서 현재가가 고가까지 남은 비율 (%).
///
/// 저가에 있으면 100, 고가에 있으면 0입니다.
pub fn upside_pct(price: Price, high52: Price, low52: Price) -> Percentage {
    let range = high52 - low52;
    if range.is_zero() {
        return Decimal::ZERO;
    }
    ((high52 - price) / range * dec!(100)).round2()
}
