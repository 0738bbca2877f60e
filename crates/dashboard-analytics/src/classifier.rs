//! 투자 등급 분류기.
//!
//! # 점수 기준
//!
//! | 조건 | 점수 | 대상 |
//! |------|------|------|
//! | 고점 대비 ≤ -최소 하락률 | +1 | 전체 |
//! | 상승여력 ≥ 최소 상승여력 | +1 | 전체 |
//! | 감성 점수 > 0 | +0.5 | 전체 |
//! | 0 < PER ≤ 최대 PER | +1 | 주식 |
//! | 배당률 ≥ 최소 배당률 | +1 | 주식 |
//!
//! 합계의 정수 부분으로 등급을 정합니다 (4 → 초초적극 매수 ... 1 → 매수, 그 외 관망).
//! 암호화폐는 밸류에이션 조건이 없어 최대 2.5점, 즉 최고 등급은 적극 매수입니다.

use dashboard_core::{Grade, InstrumentRecord, Market, Thresholds};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 분류 점수 (0 ~ 4.5).
pub fn score(record: &InstrumentRecord, thresholds: &Thresholds) -> Decimal {
    let mut score = Decimal::ZERO;

    if record.drop_from_high_pct <= -thresholds.min_drop_pct {
        score += Decimal::ONE;
    }
    if record.upside_pct >= thresholds.min_upside_pct {
        score += Decimal::ONE;
    }
    if record.sentiment_score > 0 {
        score += dec!(0.5);
    }

    if record.market != Market::Crypto {
        if record.per > Decimal::ZERO && record.per <= thresholds.max_per {
            score += Decimal::ONE;
        }
        if record.dividend_yield_pct >= thresholds.min_dividend_pct {
            score += Decimal::ONE;
        }
    }

    score
}

/// 레코드의 투자 등급.
///
/// `size_by_dividend` 같은 표시 옵션은 결과에 영향을 주지 않습니다.
pub fn classify(record: &InstrumentRecord, thresholds: &Thresholds) -> Grade {
    let points = score(record, thresholds).trunc().to_i64().unwrap_or(0);
    Grade::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::SentimentLabel;

    fn record(market: Market) -> InstrumentRecord {
        InstrumentRecord {
            market,
            symbol: "TEST".to_string(),
            display_name: "Test".to_string(),
            price: dec!(80),
            high52: dec!(100),
            low52: dec!(50),
            per: Decimal::ZERO,
            pbr: Decimal::ZERO,
            dividend_yield_pct: Decimal::ZERO,
            change_pct_24h: Decimal::ZERO,
            drop_from_high_pct: dec!(-20),
            upside_pct: dec!(40),
            sentiment_score: 0,
            sentiment_label: SentimentLabel::Neutral,
            headlines: vec![],
            news_corpus: vec![],
            keywords: vec![],
            grade: Grade::Watch,
        }
    }

    /// 모든 조건을 만족하는 레코드.
    fn best(market: Market) -> InstrumentRecord {
        InstrumentRecord {
            drop_from_high_pct: dec!(-60),
            upside_pct: dec!(90),
            sentiment_score: 3,
            per: dec!(8),
            dividend_yield_pct: dec!(6),
            ..record(market)
        }
    }

    #[test]
    fn test_no_criteria_is_watch() {
        let thresholds = Thresholds::default();
        assert_eq!(score(&record(Market::Kr), &thresholds), Decimal::ZERO);
        assert_eq!(classify(&record(Market::Kr), &thresholds), Grade::Watch);
    }

    #[test]
    fn test_sentiment_alone_is_watch() {
        let r = InstrumentRecord {
            sentiment_score: 2,
            ..record(Market::Us)
        };
        assert_eq!(score(&r, &Thresholds::default()), dec!(0.5));
        assert_eq!(classify(&r, &Thresholds::default()), Grade::Watch);
    }

    #[test]
    fn test_all_criteria_equity() {
        let thresholds = Thresholds::default();
        assert_eq!(score(&best(Market::Kr), &thresholds), dec!(4.5));
        assert_eq!(classify(&best(Market::Kr), &thresholds), Grade::StrongStrongBuy);
    }

    #[test]
    fn test_crypto_capped_at_aggressive_buy() {
        let thresholds = Thresholds::default();
        let r = best(Market::Crypto);
        assert_eq!(score(&r, &thresholds), dec!(2.5));
        assert_eq!(classify(&r, &thresholds), Grade::AggressiveBuy);

        // 기준을 아무리 낮춰도 초적극 매수 이상은 불가
        let loose = Thresholds {
            max_per: dec!(50),
            min_upside_pct: Decimal::ZERO,
            min_drop_pct: Decimal::ZERO,
            min_dividend_pct: Decimal::ZERO,
            size_by_dividend: true,
        };
        assert!(classify(&r, &loose) < Grade::StrongBuy);
    }

    #[test]
    fn test_zero_per_never_counts() {
        let thresholds = Thresholds {
            max_per: dec!(50),
            ..Default::default()
        };
        let r = record(Market::Kr);
        assert_eq!(r.per, Decimal::ZERO);
        assert_eq!(score(&r, &thresholds), Decimal::ZERO);

        let negative = InstrumentRecord {
            per: dec!(-5),
            ..record(Market::Kr)
        };
        assert_eq!(score(&negative, &thresholds), Decimal::ZERO);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let thresholds = Thresholds::default();
        let r = InstrumentRecord {
            drop_from_high_pct: dec!(-30),
            upside_pct: dec!(70),
            per: dec!(20),
            dividend_yield_pct: dec!(4.0),
            ..record(Market::Kr)
        };
        assert_eq!(classify(&r, &thresholds), Grade::StrongStrongBuy);
    }

    #[test]
    fn test_monotonic_in_each_criterion() {
        let thresholds = Thresholds::default();
        let base = record(Market::Kr);

        let improvements: Vec<InstrumentRecord> = vec![
            InstrumentRecord { drop_from_high_pct: dec!(-45), ..base.clone() },
            InstrumentRecord { upside_pct: dec!(85), ..base.clone() },
            InstrumentRecord { sentiment_score: 1, ..base.clone() },
            InstrumentRecord { per: dec!(10), ..base.clone() },
            InstrumentRecord { dividend_yield_pct: dec!(5), ..base.clone() },
        ];

        for improved in &improvements {
            assert!(score(improved, &thresholds) > score(&base, &thresholds));
            assert!(classify(improved, &thresholds) >= classify(&base, &thresholds));
        }

        // 이미 만족한 레코드에 조건을 더해도 등급이 내려가지 않음
        let mut current = base;
        let mut previous = classify(&current, &thresholds);
        for improved in improvements {
            current = InstrumentRecord {
                drop_from_high_pct: current.drop_from_high_pct.min(improved.drop_from_high_pct),
                upside_pct: current.upside_pct.max(improved.upside_pct),
                sentiment_score: current.sentiment_score.max(improved.sentiment_score),
                per: current.per.max(improved.per),
                dividend_yield_pct: current.dividend_yield_pct.max(improved.dividend_yield_pct),
                ..current
            };
            let grade = classify(&current, &thresholds);
            assert!(grade >= previous);
            previous = grade;
        }
        assert_eq!(previous, Grade::StrongStrongBuy);
    }

    #[test]
    fn test_dividend_toggle_does_not_affect_grade() {
        let on = Thresholds::default();
        let off = Thresholds {
            size_by_dividend: false,
            ..Default::default()
        };
        let r = best(Market::Us);
        assert_eq!(classify(&r, &on), classify(&r, &off));
    }
}
