//! 암호화폐 시세 소스 (업비트 원화 마켓).

use async_trait::async_trait;
use dashboard_core::{decimal_from_f64, DecimalExt, Market, MarketDataSource, RawQuote, SourceError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::provider::UpbitClient;

/// 암호화폐 시세 소스.
///
/// 밸류에이션 지표는 항상 0이고, 24시간 변동률을 함께 제공합니다.
pub struct CryptoSource {
    upbit: UpbitClient,
}

impl CryptoSource {
    /// 새 소스를 생성합니다.
    pub fn new(upbit: UpbitClient) -> Self {
        Self { upbit }
    }
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, SourceError> {
    decimal_from_f64(value).ok_or_else(|| SourceError::Parse(format!("invalid {}: {}", field, value)))
}

#[async_trait]
impl MarketDataSource for CryptoSource {
    fn market(&self) -> Market {
        Market::Crypto
    }

    fn source_name(&self) -> &str {
        "upbit"
    }

    async fn fetch_instrument(&self, symbol: &str) -> Result<Option<RawQuote>, SourceError> {
        let Some(ticker) = self.upbit.ticker(symbol).await? else {
            return Ok(None);
        };

        let price = to_decimal("trade_price", ticker.trade_price)?;
        let high = to_decimal("highest_52_week_price", ticker.highest_52_week_price)?;
        let low = to_decimal("lowest_52_week_price", ticker.lowest_52_week_price)?;
        let change = (to_decimal("signed_change_rate", ticker.signed_change_rate)? * dec!(100)).round2();

        let mut quote = RawQuote::new(symbol, price).with_range(high, low);
        quote.change_pct_24h = change;
        Ok(Some(quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[tokio::test]
    async fn test_fetch_instrument() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/ticker")
            .match_query(mockito::Matcher::UrlEncoded("markets".into(), "KRW-ETH".into()))
            .with_body(
                r#"[{"market": "KRW-ETH", "trade_price": 5000000.0,
                     "highest_52_week_price": 6000000.0, "lowest_52_week_price": 3000000.0,
                     "signed_change_rate": 0.012345}]"#,
            )
            .create_async()
            .await;

        let source = CryptoSource::new(UpbitClient::new(Client::new()).with_base_url(server.url()));
        let quote = source.fetch_instrument("ETH").await.unwrap().unwrap();

        assert_eq!(quote.display_name, "ETH");
        assert_eq!(quote.news_query, "ETH");
        assert_eq!(quote.price, dec!(5000000));
        assert_eq!(quote.high52, dec!(6000000));
        assert_eq!(quote.low52, dec!(3000000));
        assert_eq!(quote.change_pct_24h, dec!(1.23));
        assert_eq!(quote.per, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_negative_change_rounds_away_from_zero() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/ticker")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"[{"market": "KRW-DOGE", "trade_price": 500.0,
                     "highest_52_week_price": 700.0, "lowest_52_week_price": 100.0,
                     "signed_change_rate": -0.02345}]"#,
            )
            .create_async()
            .await;

        let source = CryptoSource::new(UpbitClient::new(Client::new()).with_base_url(server.url()));
        let quote = source.fetch_instrument("DOGE").await.unwrap().unwrap();
        assert_eq!(quote.change_pct_24h, dec!(-2.35));
    }
}
