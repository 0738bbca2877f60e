//! 업비트 시세 API 클라이언트.
//!
//! `GET /v1/ticker?markets=KRW-{SYMBOL}` 공개 API를 사용합니다 (인증 불필요).

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{DataError, Result};

/// 업비트 현재가 정보.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpbitTicker {
    /// 마켓 코드 (예: KRW-BTC)
    pub market: String,
    /// 현재가
    pub trade_price: f64,
    /// 52주 최고가
    pub highest_52_week_price: f64,
    /// 52주 최저가
    pub lowest_52_week_price: f64,
    /// 전일 대비 부호 있는 변화율 (0.0123 = 1.23%)
    pub signed_change_rate: f64,
}

/// 업비트 API 클라이언트.
#[derive(Clone)]
pub struct UpbitClient {
    client: Client,
    base_url: String,
}

impl UpbitClient {
    /// 기본 URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.upbit.com";

    /// 새 클라이언트를 생성합니다.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 기본 URL 변경 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 원화 마켓 현재가 조회.
    ///
    /// 존재하지 않는 마켓(404)이나 빈 배열은 `Ok(None)`.
    pub async fn ticker(&self, symbol: &str) -> Result<Option<UpbitTicker>> {
        let url = format!("{}/v1/ticker", self.base_url);
        let market = format!("KRW-{}", symbol.to_uppercase());

        let response = self
            .client
            .get(&url)
            .query(&[("markets", market.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(market = %market, "업비트 마켓 없음");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::from_status("Upbit", status, body));
        }

        let tickers: Vec<UpbitTicker> = response.json().await?;
        Ok(tickers.into_iter().next())
    }
}
