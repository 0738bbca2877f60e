//! 미국 주식 시세 소스 (Finnhub).

use async_trait::async_trait;
use dashboard_core::{decimal_from_f64, decimal_or_zero, Market, MarketDataSource, RawQuote, SourceError};
use rust_decimal::Decimal;

use crate::provider::FinnhubClient;

/// 미국 주식 시세 소스.
///
/// 현재가가 없거나 0이면 해당 종목은 건너뜁니다.
pub struct UsStockSource {
    finnhub: FinnhubClient,
}

impl UsStockSource {
    /// 새 소스를 생성합니다.
    pub fn new(finnhub: FinnhubClient) -> Self {
        Self { finnhub }
    }
}

/// 누락 또는 0이면 대체값 사용.
fn or_price(value: Option<f64>, price: Decimal) -> Decimal {
    match decimal_or_zero(value) {
        v if v.is_zero() => price,
        v => v,
    }
}

#[async_trait]
impl MarketDataSource for UsStockSource {
    fn market(&self) -> Market {
        Market::Us
    }

    fn source_name(&self) -> &str {
        "finnhub"
    }

    async fn fetch_instrument(&self, symbol: &str) -> Result<Option<RawQuote>, SourceError> {
        let quote = self.finnhub.quote(symbol).await?;
        let price = match quote.c.and_then(decimal_from_f64) {
            Some(p) if !p.is_zero() => p,
            _ => {
                tracing::debug!(symbol = symbol, "No quote from Finnhub");
                return Ok(None);
            }
        };

        let profile = self.finnhub.profile(symbol).await?;
        let name = profile
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| symbol.to_string());

        let metric = self.finnhub.metrics(symbol).await?.metric;

        Ok(Some(
            RawQuote::new(symbol, price)
                .with_name(name)
                .with_range(
                    or_price(metric.week_52_high, price),
                    or_price(metric.week_52_low, price),
                )
                .with_valuation(
                    decimal_or_zero(metric.per),
                    decimal_or_zero(metric.pbr),
                    decimal_or_zero(metric.dividend_yield),
                ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::Client;
    use rust_decimal_macros::dec;

    async fn server_with(
        quote: &str,
        profile: &str,
        metric: &str,
    ) -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/quote")
            .match_query(Matcher::Any)
            .with_body(quote)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/stock/profile2")
            .match_query(Matcher::Any)
            .with_body(profile)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/stock/metric")
            .match_query(Matcher::Any)
            .with_body(metric)
            .create_async()
            .await;
        server
    }

    fn source(url: String) -> UsStockSource {
        UsStockSource::new(FinnhubClient::new(Client::new(), "tkn").with_base_url(url))
    }

    #[tokio::test]
    async fn test_fetch_instrument() {
        let server = server_with(
            r#"{"c": 80.0}"#,
            r#"{"name": "Example Corp", "ticker": "EXM"}"#,
            r#"{"metric": {"52WeekHigh": 100.0, "52WeekLow": 50.0,
                "peBasicExclExtraTTM": 12.5, "pbAnnual": 2.1,
                "dividendYieldIndicatedAnnual": 4.2}}"#,
        )
        .await;

        let quote = source(server.url())
            .fetch_instrument("EXM")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quote.display_name, "Example Corp");
        assert_eq!(quote.news_query, "EXM");
        assert_eq!(quote.price, dec!(80));
        assert_eq!(quote.high52, dec!(100));
        assert_eq!(quote.low52, dec!(50));
        assert_eq!(quote.per, dec!(12.5));
        assert_eq!(quote.dividend_yield_pct, dec!(4.2));
    }

    #[tokio::test]
    async fn test_zero_price_is_skipped() {
        let server = server_with(r#"{"c": 0, "d": null}"#, "{}", r#"{"metric": {}}"#).await;
        assert!(source(server.url())
            .fetch_instrument("ZZZZ")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_missing_metrics_default() {
        let server = server_with(r#"{"c": 12.34}"#, "{}", r#"{"metric": {"52WeekHigh": 0}}"#).await;

        let quote = source(server.url())
            .fetch_instrument("NEWCO")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quote.display_name, "NEWCO");
        assert_eq!(quote.high52, dec!(12.34));
        assert_eq!(quote.low52, dec!(12.34));
        assert_eq!(quote.per, Decimal::ZERO);
        assert_eq!(quote.pbr, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_auth_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/quote")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error": "Invalid API key"}"#)
            .create_async()
            .await;

        let err = source(server.url()).fetch_instrument("AAPL").await.unwrap_err();
        assert!(matches!(err, SourceError::Authentication(_)));
    }
}
