//! 종목 분석 파이프라인.
//!
//! 종목마다 순서대로 실행합니다:
//!
//! ```text
//! 시세 조회 → 뉴스 조회 → 감성 점수 → 키워드 → 파생 지표 → 등급
//! ```
//!
//! 종목 하나의 실패는 다른 종목에 영향을 주지 않습니다.
//! - 시세 없음 → [`TickerOutcome::Skipped`]
//! - 시세 조회 에러 → [`TickerOutcome::Failed`]
//! - 뉴스 조회 에러 → 빈 뉴스(중립)로 계속 진행

use dashboard_core::{
    DecimalExt, Grade, InstrumentRecord, Market, MarketDataSource, NewsBundle, NewsSource, RawQuote,
    SourceError, Thresholds,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn, Instrument};

use crate::classifier::classify;
use crate::keywords::extract_keywords;
use crate::metrics::{drop_from_high_pct, upside_pct};
use crate::sentiment::score_articles;

/// 분석 실행 에러.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 소스 준비 실패 (기준일/종목 목록 적재 등)
    #[error("{source_name} 준비 실패: {error}")]
    Prepare {
        source_name: String,
        #[source]
        error: SourceError,
    },
}

/// 종목 하나의 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerOutcome {
    /// 분석 완료
    Analyzed(InstrumentRecord),
    /// 데이터가 없어 건너뜀
    Skipped { symbol: String, reason: String },
    /// 조회 중 에러
    Failed { symbol: String, error: String },
}

impl TickerOutcome {
    /// 종목 심볼.
    pub fn symbol(&self) -> &str {
        match self {
            TickerOutcome::Analyzed(record) => &record.symbol,
            TickerOutcome::Skipped { symbol, .. } | TickerOutcome::Failed { symbol, .. } => {
                symbol
            }
        }
    }
}

/// 분석 1회 실행 결과 (입력 순서 유지).
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    /// 대상 시장
    pub market: Market,
    /// 실행 시점의 필터 기준
    pub thresholds: Thresholds,
    /// 종목별 결과
    pub outcomes: Vec<TickerOutcome>,
}

impl AnalysisRun {
    /// 분석 완료된 레코드.
    pub fn records(&self) -> impl Iterator<Item = &InstrumentRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            TickerOutcome::Analyzed(record) => Some(record),
            _ => None,
        })
    }

    /// 건너뛴 종목 `(심볼, 사유)`.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            TickerOutcome::Skipped { symbol, reason } => Some((symbol.as_str(), reason.as_str())),
            _ => None,
        })
    }

    /// 실패한 종목 `(심볼, 에러)`.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            TickerOutcome::Failed { symbol, error } => Some((symbol.as_str(), error.as_str())),
            _ => None,
        })
    }

    /// 레코드를 소유권째 꺼냅니다.
    pub fn into_records(self) -> Vec<InstrumentRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                TickerOutcome::Analyzed(record) => Some(record),
                _ => None,
            })
            .collect()
    }
}

/// 종목 분석기.
///
/// 시세 소스와 뉴스 소스를 받아 종목을 하나씩 순차 처리합니다.
pub struct Analyzer {
    quotes: Box<dyn MarketDataSource>,
    news: Box<dyn NewsSource>,
    request_delay: Duration,
}

impl Analyzer {
    /// 새 분석기를 생성합니다.
    pub fn new(quotes: Box<dyn MarketDataSource>, news: Box<dyn NewsSource>) -> Self {
        Self {
            quotes,
            news,
            request_delay: Duration::ZERO,
        }
    }

    /// 종목 간 딜레이를 설정합니다.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// 대상 시장.
    pub fn market(&self) -> Market {
        self.quotes.market()
    }

    /// 종목 목록을 분석합니다.
    ///
    /// 소스 준비 단계가 실패한 경우에만 에러를 반환하고,
    /// 종목별 문제는 [`TickerOutcome`]으로 기록합니다.
    pub async fn run(
        &self,
        tickers: &[String],
        thresholds: &Thresholds,
    ) -> Result<AnalysisRun, AnalysisError> {
        let market = self.market();

        self.quotes
            .prepare()
            .await
            .map_err(|error| AnalysisError::Prepare {
                source_name: self.quotes.source_name().to_string(),
                error,
            })?;

        info!(market = %market, tickers = tickers.len(), "Analysis started");

        let mut outcomes = Vec::with_capacity(tickers.len());
        for (index, symbol) in tickers.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let span = dashboard_core::ticker_span!("analyze", market, symbol);
            let outcome = self.analyze(symbol, thresholds).instrument(span).await;
            outcomes.push(outcome);
        }

        let run = AnalysisRun {
            market,
            thresholds: thresholds.clone(),
            outcomes,
        };
        info!(
            market = %market,
            analyzed = run.records().count(),
            skipped = run.skipped().count(),
            failed = run.failed().count(),
            "Analysis finished"
        );
        Ok(run)
    }

    /// 종목 하나를 분석합니다.
    async fn analyze(&self, symbol: &str, thresholds: &Thresholds) -> TickerOutcome {
        let quote = match self.quotes.fetch_instrument(symbol).await {
            Ok(Some(quote)) => quote,
            Ok(None) => {
                info!("No data, skipping");
                return TickerOutcome::Skipped {
                    symbol: symbol.to_string(),
                    reason: "시세 데이터 없음".to_string(),
                };
            }
            Err(e) => {
                error!(error = %e, "Quote fetch failed");
                return TickerOutcome::Failed {
                    symbol: symbol.to_string(),
                    error: e.to_string(),
                };
            }
        };

        let news = match self.news.fetch_news(&quote.news_query).await {
            Ok(articles) => score_articles(&articles),
            Err(e) => {
                warn!(source = self.news.source_name(), error = %e, "News fetch failed, using neutral sentiment");
                NewsBundle::empty()
            }
        };

        let record = build_record(self.market(), quote, news, thresholds);
        info!(grade = %record.grade, sentiment = record.sentiment_score, "Analyzed");
        TickerOutcome::Analyzed(record)
    }
}

/// 시세와 뉴스 결과로 분석 레코드를 만듭니다.
///
/// 밸류에이션 지표와 변동률은 소수점 둘째 자리로 반올림해 저장합니다.
pub fn build_record(
    market: Market,
    quote: RawQuote,
    news: NewsBundle,
    thresholds: &Thresholds,
) -> InstrumentRecord {
    let keywords = extract_keywords(&news.corpus, &quote.display_name, market);

    let mut record = InstrumentRecord {
        market,
        drop_from_high_pct: drop_from_high_pct(quote.price, quote.high52),
        upside_pct: upside_pct(quote.price, quote.high52, quote.low52),
        symbol: quote.symbol,
        display_name: quote.display_name,
        price: quote.price,
        high52: quote.high52,
        low52: quote.low52,
        per: quote.per.round2(),
        pbr: quote.pbr.round2(),
        dividend_yield_pct: quote.dividend_yield_pct.round2(),
        change_pct_24h: quote.change_pct_24h.round2(),
        sentiment_score: news.score,
        sentiment_label: news.label,
        headlines: news.headlines,
        news_corpus: news.corpus,
        keywords,
        grade: Grade::Watch,
    };
    record.grade = classify(&record, thresholds);
    record
}
