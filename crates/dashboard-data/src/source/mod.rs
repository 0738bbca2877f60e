//! 시장별 데이터 소스 구현.
//!
//! `dashboard_core`의 [`MarketDataSource`] / [`NewsSource`] trait을
//! Provider 클라이언트들을 조합해 구현합니다.
//!
//! | 시장 | 시세 소스 | 뉴스 소스 |
//! |------|----------|----------|
//! | 한국주식 | [`KrStockSource`] (KRX + 네이버 금융) | [`NaverNewsSource`] (종목명 검색) |
//! | 미국주식 | [`UsStockSource`] (Finnhub) | [`FinnhubNewsSource`] (최근 3일) |
//! | 암호화폐 | [`CryptoSource`] (업비트) | [`NaverNewsSource`] (심볼 검색) |

mod crypto;
mod kr;
mod news;
mod us;

pub use crypto::CryptoSource;
pub use kr::KrStockSource;
pub use news::{FinnhubNewsSource, NaverNewsSource};
pub use us::UsStockSource;

use chrono::{NaiveDate, Utc};
use dashboard_core::{AppConfig, Market, MarketDataSource, NewsSource};

use crate::error::{DataError, Result};
use crate::provider::{
    build_http_client, FinnhubClient, KrxApiClient, NaverFinanceFetcher, NaverNewsClient,
    UpbitClient,
};

/// 종목당 수집하는 최대 뉴스 건수.
pub const MAX_ARTICLES: usize = 3;

/// 한국 시간 기준 오늘 날짜.
pub fn seoul_today() -> NaiveDate {
    Utc::now().with_timezone(&chrono_tz::Asia::Seoul).date_naive()
}

/// 한 시장을 분석하는 데 필요한 소스 묶음.
pub struct MarketSources {
    /// 시세 소스
    pub quotes: Box<dyn MarketDataSource>,
    /// 뉴스 소스
    pub news: Box<dyn NewsSource>,
}

/// 시장에 맞는 시세/뉴스 소스를 생성합니다.
///
/// 시세 조회에 필요한 API 키가 없으면 `ConfigError`를 반환합니다.
/// 네이버 뉴스 키가 없으면 경고만 남기고, 뉴스는 빈 결과(중립)로 처리됩니다.
pub fn build_sources(market: Market, config: &AppConfig) -> Result<MarketSources> {
    let api = &config.api;
    if let Some(missing) = api.missing_keys(market).first() {
        return Err(DataError::ConfigError(format!(
            "{} is required for the {} market",
            missing, market
        )));
    }

    let client = build_http_client(&config.http)?;

    let naver_news = || {
        if !api.has_naver_news() {
            tracing::warn!("Naver search credentials not set; news sentiment will be neutral");
        }
        NaverNewsSource::new(NaverNewsClient::new(
            client.clone(),
            api.naver_client_id.as_str(),
            api.naver_client_secret.as_str(),
        ))
    };

    let sources = match market {
        Market::Kr => MarketSources {
            quotes: Box::new(KrStockSource::new(
                KrxApiClient::new(client.clone(), api.krx_api_key.as_str()),
                NaverFinanceFetcher::new(client.clone()),
            )),
            news: Box::new(naver_news()),
        },
        Market::Us => {
            let finnhub = FinnhubClient::new(client.clone(), api.finnhub_api_key.as_str());
            MarketSources {
                quotes: Box::new(UsStockSource::new(finnhub.clone())),
                news: Box::new(FinnhubNewsSource::new(finnhub)),
            }
        }
        Market::Crypto => MarketSources {
            quotes: Box::new(CryptoSource::new(UpbitClient::new(client.clone()))),
            news: Box::new(naver_news()),
        },
    };

    tracing::debug!(
        market = %market,
        quotes = sources.quotes.source_name(),
        news = sources.news.source_name(),
        "Data sources ready"
    );
    Ok(sources)
}
