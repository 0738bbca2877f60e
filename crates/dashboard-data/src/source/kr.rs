//! 한국 주식 시세 소스 (KRX + 네이버 금융).

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use dashboard_core::{Market, MarketDataSource, RawQuote, SourceError};
use std::collections::HashMap;
use tokio::sync::OnceCell;

use super::seoul_today;
use crate::error::Result;
use crate::provider::krx_api::format_krx_date;
use crate::provider::{KrxApiClient, NaverFinanceFetcher};

/// 개장일 확인에 사용하는 기준 종목 (삼성전자).
const PROBE_TICKER: &str = "005930";

/// 개장일을 찾기 위해 거슬러 올라가는 최대 일수.
const TRADING_DAY_LOOKBACK: i64 = 10;

/// 52주 범위 계산 기간 (일).
const RANGE_DAYS: i64 = 365;

/// 분석 실행 단위로 한 번만 계산되는 시장 상태.
#[derive(Debug)]
struct KrMarketState {
    trading_day: NaiveDate,
    names: HashMap<String, String>,
}

/// 한국 주식 시세 소스.
///
/// - 종목명: KRX KOSPI + KOSDAQ 기본 정보 (실행당 한 번 적재)
/// - 현재가: 최근 개장일 종가
/// - 52주 고저: 최근 365일 고가 최대 / 저가 최소
/// - PER/PBR/배당수익률: 네이버 금융 (실패 시 0)
pub struct KrStockSource {
    krx: KrxApiClient,
    naver: NaverFinanceFetcher,
    today: Option<NaiveDate>,
    state: OnceCell<KrMarketState>,
}

impl KrStockSource {
    /// 새 소스를 생성합니다.
    pub fn new(krx: KrxApiClient, naver: NaverFinanceFetcher) -> Self {
        Self {
            krx,
            naver,
            today: None,
            state: OnceCell::new(),
        }
    }

    /// 기준 날짜를 고정합니다 (테스트용, 기본값은 한국 시간 오늘).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// 최근 개장일.
    ///
    /// 오늘부터 최대 10일 전까지 거슬러 올라가며 기준 종목의 일별 시세가
    /// 있는 첫 날을 반환합니다. 없으면 오늘.
    pub async fn safe_trading_day(&self, today: NaiveDate) -> Result<NaiveDate> {
        for offset in 0..TRADING_DAY_LOOKBACK {
            let day = today - Duration::days(offset);
            let date = format_krx_date(day);
            let candles = self.krx.fetch_daily_ohlcv(PROBE_TICKER, &date, &date).await?;
            if !candles.is_empty() {
                return Ok(day);
            }
        }
        tracing::warn!(today = %today, "No trading day found in lookback window, using today");
        Ok(today)
    }

    async fn state(&self) -> Result<&KrMarketState> {
        self.state.get_or_try_init(|| self.load_state()).await
    }

    async fn load_state(&self) -> Result<KrMarketState> {
        let today = self.today.unwrap_or_else(seoul_today);
        let trading_day = self.safe_trading_day(today).await?;
        let base_date = format_krx_date(trading_day);

        let mut names = HashMap::new();
        for stock in self.krx.fetch_kospi_stocks(&base_date).await? {
            names.insert(stock.ticker, stock.name);
        }
        for stock in self.krx.fetch_kosdaq_stocks(&base_date).await? {
            names.insert(stock.ticker, stock.name);
        }

        tracing::info!(
            trading_day = %trading_day,
            listed = names.len(),
            "KRX reference data loaded"
        );
        Ok(KrMarketState { trading_day, names })
    }
}

#[async_trait]
impl MarketDataSource for KrStockSource {
    fn market(&self) -> Market {
        Market::Kr
    }

    fn source_name(&self) -> &str {
        "krx"
    }

    async fn prepare(&self) -> std::result::Result<(), SourceError> {
        self.state().await?;
        Ok(())
    }

    async fn fetch_instrument(
        &self,
        symbol: &str,
    ) -> std::result::Result<Option<RawQuote>, SourceError> {
        let state = self.state().await?;

        let Some(name) = state.names.get(symbol) else {
            tracing::debug!(symbol = symbol, "Not a listed KRX ticker");
            return Ok(None);
        };

        let end = state.trading_day;
        let start = end - Duration::days(RANGE_DAYS);
        let history = self
            .krx
            .fetch_daily_ohlcv(symbol, &format_krx_date(start), &format_krx_date(end))
            .await?;

        let Some(latest) = history.last() else {
            tracing::debug!(symbol = symbol, "No OHLCV history");
            return Ok(None);
        };
        let price = latest.close;
        let high = history.iter().map(|c| c.high).max().unwrap_or(price);
        let low = history.iter().map(|c| c.low).min().unwrap_or(price);

        let valuation = match self.naver.fetch_valuation(symbol).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(symbol = symbol, error = %e, "Valuation scrape failed, using zeros");
                Default::default()
            }
        };

        Ok(Some(
            RawQuote::new(symbol, price)
                .with_name(name.as_str())
                .with_range(high, low)
                .with_valuation(valuation.per, valuation.pbr, valuation.dividend_yield)
                .with_news_query(name.as_str()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::Client;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        // 2025-01-12 (일요일) → 개장일은 2025-01-10 (금요일)
        NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()
    }

    async fn mock_krx(server: &mut mockito::ServerGuard) {
        // 주말에는 빈 응답
        server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_ohlcv")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("isuCd".into(), "005930".into()),
                Matcher::UrlEncoded("strtDd".into(), "20250112".into()),
            ]))
            .with_body(r#"{"OutBlock_1": []}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_ohlcv")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("isuCd".into(), "005930".into()),
                Matcher::UrlEncoded("strtDd".into(), "20250111".into()),
            ]))
            .with_body(r#"{"OutBlock_1": []}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_ohlcv")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("isuCd".into(), "005930".into()),
                Matcher::UrlEncoded("strtDd".into(), "20250110".into()),
            ]))
            .with_body(
                r#"{"OutBlock_1": [{"TRD_DD": "2025/01/10", "TDD_OPNPRC": "54,000",
                    "TDD_HGPRC": "55,100", "TDD_LWPRC": "53,800", "TDD_CLSPRC": "54,900",
                    "ACC_TRDVOL": "100"}]}"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_base_info")
            .match_query(Matcher::UrlEncoded("basDd".into(), "20250110".into()))
            .with_body(r#"{"OutBlock_1": [{"ISU_SRT_CD": "000660", "ISU_ABBRV": "SK하이닉스"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/svc/sample/apis/stk/ksq_isu_base_info")
            .match_query(Matcher::UrlEncoded("basDd".into(), "20250110".into()))
            .with_body(r#"{"OutBlock_1": [{"ISU_SRT_CD": "035900", "ISU_ABBRV": "JYP Ent."}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_ohlcv")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("isuCd".into(), "000660".into()),
                Matcher::UrlEncoded("strtDd".into(), "20240111".into()),
                Matcher::UrlEncoded("endDd".into(), "20250110".into()),
            ]))
            .with_body(
                r#"{"OutBlock_1": [
                    {"TRD_DD": "2025/01/10", "TDD_HGPRC": "200,000", "TDD_LWPRC": "190,000", "TDD_CLSPRC": "196,000"},
                    {"TRD_DD": "2024/07/11", "TDD_HGPRC": "248,500", "TDD_LWPRC": "240,000", "TDD_CLSPRC": "241,000"},
                    {"TRD_DD": "2024/01/11", "TDD_HGPRC": "140,000", "TDD_LWPRC": "132,000", "TDD_CLSPRC": "135,000"}
                ]}"#,
            )
            .create_async()
            .await;
    }

    fn source(krx_url: String, naver_url: String) -> KrStockSource {
        KrStockSource::new(
            KrxApiClient::new(Client::new(), "key").with_base_url(krx_url),
            NaverFinanceFetcher::new(Client::new()).with_base_url(naver_url),
        )
        .with_today(today())
    }

    #[tokio::test]
    async fn test_fetch_instrument() {
        let mut krx = mockito::Server::new_async().await;
        mock_krx(&mut krx).await;

        let mut naver = mockito::Server::new_async().await;
        naver
            .mock("GET", "/item/main.naver")
            .match_query(Matcher::UrlEncoded("code".into(), "000660".into()))
            .with_body(r#"<em id="_per">7.52</em><em id="_pbr">1.61</em><em id="_dvr">0.61</em>"#)
            .create_async()
            .await;

        let source = source(krx.url(), naver.url());
        source.prepare().await.unwrap();

        let quote = source.fetch_instrument("000660").await.unwrap().unwrap();
        assert_eq!(quote.display_name, "SK하이닉스");
        assert_eq!(quote.news_query, "SK하이닉스");
        assert_eq!(quote.price, dec!(196000));
        assert_eq!(quote.high52, dec!(248500));
        assert_eq!(quote.low52, dec!(132000));
        assert_eq!(quote.per, dec!(7.52));
        assert_eq!(quote.dividend_yield_pct, dec!(0.61));
    }

    #[tokio::test]
    async fn test_unlisted_ticker_is_skipped() {
        let mut krx = mockito::Server::new_async().await;
        mock_krx(&mut krx).await;

        let source = source(krx.url(), "http://127.0.0.1:9".to_string());
        assert!(source.fetch_instrument("999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scrape_failure_degrades_to_zero() {
        let mut krx = mockito::Server::new_async().await;
        mock_krx(&mut krx).await;

        let mut naver = mockito::Server::new_async().await;
        naver
            .mock("GET", "/item/main.naver")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let source = source(krx.url(), naver.url());
        let quote = source.fetch_instrument("000660").await.unwrap().unwrap();
        assert_eq!(quote.per, Decimal::ZERO);
        assert_eq!(quote.pbr, Decimal::ZERO);
        assert_eq!(quote.dividend_yield_pct, Decimal::ZERO);
        assert_eq!(quote.price, dec!(196000));
    }

    #[tokio::test]
    async fn test_safe_trading_day_walks_back() {
        let mut krx = mockito::Server::new_async().await;
        mock_krx(&mut krx).await;

        let source = source(krx.url(), "http://127.0.0.1:9".to_string());
        let day = source.safe_trading_day(today()).await.unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    }
}
