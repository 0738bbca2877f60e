//! 데이터 Provider 모듈.
//!
//! 외부 API/페이지와 직접 통신하는 저수준 클라이언트들입니다.
//!
//! ## KRX Open API
//! - `KrxApiClient`: KOSPI/KOSDAQ 종목 기본 정보, 일별 OHLCV (인증키 필요)
//!
//! ## 네이버
//! - `NaverFinanceFetcher`: 네이버 금융 종목 페이지에서 PER/PBR/배당수익률 추출
//! - `NaverNewsClient`: 네이버 뉴스 검색 API (Client ID/Secret 필요)
//!
//! ## Finnhub
//! - `FinnhubClient`: 미국 주식 시세, 기업 프로필, 지표, 기업 뉴스 (토큰 필요)
//!
//! ## 업비트
//! - `UpbitClient`: 원화 마켓 암호화폐 시세 (공개 API)

pub mod finnhub;
pub mod krx_api;
pub mod naver;
pub mod naver_news;
pub mod upbit;

pub use finnhub::{FinnhubClient, FinnhubMetrics, FinnhubNewsItem, FinnhubProfile, FinnhubQuote};
pub use krx_api::{KrxApiClient, KrxOhlcv, KrxStockInfo};
pub use naver::{NaverError, NaverFinanceFetcher, NaverValuation};
pub use naver_news::NaverNewsClient;
pub use upbit::{UpbitClient, UpbitTicker};

use dashboard_core::HttpConfig;
use reqwest::Client;

use crate::error::Result;

/// 설정의 타임아웃과 User-Agent로 HTTP 클라이언트를 생성합니다.
///
/// 모든 Provider가 하나의 클라이언트(커넥션 풀)를 공유합니다.
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}
