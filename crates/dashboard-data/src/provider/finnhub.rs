//! Finnhub API 클라이언트.
//!
//! 미국 주식의 시세, 기업 프로필, 기본 지표, 기업 뉴스를 조회합니다.
//!
//! | 엔드포인트 | 사용 필드 |
//! |-----------|----------|
//! | `/api/v1/quote` | `c` (현재가) |
//! | `/api/v1/stock/profile2` | `name` |
//! | `/api/v1/stock/metric?metric=all` | `52WeekHigh`, `52WeekLow`, `peBasicExclExtraTTM`, `pbAnnual`, `dividendYieldIndicatedAnnual` |
//! | `/api/v1/company-news` | `headline`, `summary` |
//!
//! 토큰은 `token` 쿼리 파라미터로 전달합니다.

use chrono::NaiveDate;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{DataError, Result};

/// 시세 응답.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinnhubQuote {
    /// 현재가 (종목이 없으면 0 또는 누락)
    #[serde(default)]
    pub c: Option<f64>,
}

/// 기업 프로필 응답 (종목이 없으면 빈 객체).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinnhubProfile {
    #[serde(default)]
    pub name: Option<String>,
}

/// 기본 지표 응답.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinnhubMetrics {
    #[serde(default)]
    pub metric: FinnhubMetricValues,
}

/// 사용하는 지표 값들. 누락되거나 `null`이면 `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinnhubMetricValues {
    #[serde(rename = "52WeekHigh", default)]
    pub week_52_high: Option<f64>,
    #[serde(rename = "52WeekLow", default)]
    pub week_52_low: Option<f64>,
    #[serde(rename = "peBasicExclExtraTTM", default)]
    pub per: Option<f64>,
    #[serde(rename = "pbAnnual", default)]
    pub pbr: Option<f64>,
    #[serde(rename = "dividendYieldIndicatedAnnual", default)]
    pub dividend_yield: Option<f64>,
}

/// 기업 뉴스 한 건.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinnhubNewsItem {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: String,
}

/// Finnhub API 클라이언트.
#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    token: String,
    base_url: String,
}

impl FinnhubClient {
    /// 기본 URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://finnhub.io";

    /// 새 클라이언트를 생성합니다.
    pub fn new(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 기본 URL 변경 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/api/v1/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", self.token.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::from_status("Finnhub", status, body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| DataError::ParseError(format!("Finnhub {}: {}", path, e)))
    }

    /// 현재가 조회.
    pub async fn quote(&self, symbol: &str) -> Result<FinnhubQuote> {
        self.get("quote", &[("symbol", symbol)]).await
    }

    /// 기업 프로필 조회.
    pub async fn profile(&self, symbol: &str) -> Result<FinnhubProfile> {
        self.get("stock/profile2", &[("symbol", symbol)]).await
    }

    /// 기본 지표 조회 (`metric=all`).
    pub async fn metrics(&self, symbol: &str) -> Result<FinnhubMetrics> {
        self.get("stock/metric", &[("symbol", symbol), ("metric", "all")])
            .await
    }

    /// 기간 내 기업 뉴스 조회 (최신순).
    pub async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinnhubNewsItem>> {
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();
        self.get(
            "company-news",
            &[("symbol", symbol), ("from", from.as_str()), ("to", to.as_str())],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_with_nulls() {
        let json = r#"{
            "metric": {
                "52WeekHigh": 260.1,
                "52WeekLow": null,
                "peBasicExclExtraTTM": 33.2,
                "beta": 1.2
            },
            "series": {},
            "symbol": "AAPL"
        }"#;
        let metrics: FinnhubMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.metric.week_52_high, Some(260.1));
        assert_eq!(metrics.metric.week_52_low, None);
        assert_eq!(metrics.metric.per, Some(33.2));
        assert_eq!(metrics.metric.dividend_yield, None);
    }

    #[test]
    fn test_empty_profile() {
        let profile: FinnhubProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.name.is_none());
    }

    #[tokio::test]
    async fn test_quote_sends_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/quote")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("symbol".into(), "AAPL".into()),
                mockito::Matcher::UrlEncoded("token".into(), "tkn".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"c": 227.5, "d": 1.2, "dp": 0.53, "h": 229, "l": 225, "o": 226, "pc": 226.3, "t": 1736500000}"#)
            .create_async()
            .await;

        let client = FinnhubClient::new(Client::new(), "tkn").with_base_url(server.url());
        let quote = client.quote("AAPL").await.unwrap();

        assert_eq!(quote.c, Some(227.5));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_company_news_range() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/company-news")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("from".into(), "2025-01-07".into()),
                mockito::Matcher::UrlEncoded("to".into(), "2025-01-10".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"[
                    {"category": "company", "headline": "Apple shares jump", "summary": "Record iPhone sales", "id": 1},
                    {"category": "company", "headline": "Supplier concern", "summary": "", "id": 2}
                ]"#,
            )
            .create_async()
            .await;

        let client = FinnhubClient::new(Client::new(), "tkn").with_base_url(server.url());
        let news = client
            .company_news(
                "AAPL",
                NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(news.len(), 2);
        assert_eq!(news[0].headline, "Apple shares jump");
        assert_eq!(news[1].summary, "");
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/stock/metric")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": "API limit reached."}"#)
            .create_async()
            .await;

        let client = FinnhubClient::new(Client::new(), "tkn").with_base_url(server.url());
        let err = client.metrics("AAPL").await.unwrap_err();
        assert!(matches!(err, DataError::RateLimited("Finnhub")));
    }
}
