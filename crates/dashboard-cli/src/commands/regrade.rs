//! 저장된 분석 결과 재분류.
//!
//! JSON으로 내보낸 레코드를 읽어 새 필터 기준으로 등급만 다시 매깁니다.
//! 시세/뉴스를 다시 조회하지 않습니다.

use anyhow::{Context, Result};
use dashboard_analytics::Session;
use dashboard_core::{InstrumentRecord, Thresholds};
use std::path::{Path, PathBuf};
use tracing::info;

use super::analyze::{present, OutputFormat, ThresholdOverrides};

/// 재분류 명령 설정.
#[derive(Debug, Clone)]
pub struct RegradeConfig {
    /// `--export result.json`으로 만든 입력 파일
    pub input: PathBuf,
    /// 필터 기준 덮어쓰기 (기본값 기준)
    pub overrides: ThresholdOverrides,
    /// 내보내기 파일 경로
    pub export: Option<PathBuf>,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 레코드 파일을 읽습니다.
pub fn load_records(path: &Path) -> Result<Vec<InstrumentRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid analysis file: {}", path.display()))
}

/// 레코드로 세션을 만들고 새 기준으로 재분류합니다.
pub fn regrade_records(records: Vec<InstrumentRecord>, thresholds: Thresholds) -> Result<Session> {
    let market = match records.first() {
        Some(record) => record.market,
        None => anyhow::bail!("Analysis file contains no records"),
    };
    if let Some(other) = records.iter().find(|r| r.market != market) {
        anyhow::bail!(
            "Mixed markets in analysis file: {} and {} ({})",
            market,
            other.market,
            other.symbol
        );
    }

    let mut session = Session::new(market, thresholds.clone(), records);
    session.regrade(thresholds);
    Ok(session)
}

/// 재분류 명령 실행.
pub fn run_regrade(config: RegradeConfig) -> Result<Session> {
    let records = load_records(&config.input)?;
    let thresholds = config.overrides.apply(Thresholds::default())?;

    let session = regrade_records(records, thresholds)?;
    info!(
        market = %session.market(),
        records = session.records().len(),
        "Regraded saved analysis"
    );

    present(&session, None, config.format, config.export.as_deref())?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{Grade, Market, SentimentLabel};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn record(symbol: &str, market: Market) -> InstrumentRecord {
        InstrumentRecord {
            market,
            symbol: symbol.to_string(),
            display_name: symbol.to_string(),
            price: dec!(80),
            high52: dec!(100),
            low52: dec!(50),
            per: dec!(10),
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
            grade: Grade::Buy,
        }
    }

    #[test]
    fn test_regrade_changes_grades_only() {
        let thresholds = Thresholds {
            max_per: dec!(5),
            ..Default::default()
        };
        let session = regrade_records(vec![record("A", Market::Us)], thresholds).unwrap();

        assert_eq!(session.market(), Market::Us);
        assert_eq!(session.records()[0].grade, Grade::Watch);
        assert_eq!(session.records()[0].price, dec!(80));
        assert_eq!(session.thresholds().max_per, dec!(5));
    }

    #[test]
    fn test_regrade_rejects_empty_and_mixed() {
        assert!(regrade_records(vec![], Thresholds::default()).is_err());

        let err = regrade_records(
            vec![record("A", Market::Us), record("BTC", Market::Crypto)],
            Thresholds::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("BTC"));
    }

    #[test]
    fn test_load_records_from_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("result.json");
        let json = serde_json::to_string_pretty(&vec![record("A", Market::Kr)]).unwrap();
        std::fs::write(&path, json).unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].per, dec!(10));

        std::fs::write(&path, "not json").unwrap();
        assert!(load_records(&path).is_err());
    }
}
