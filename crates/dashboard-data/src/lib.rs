//! 시세 및 뉴스 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - 외부 API 클라이언트 (KRX Open API, 네이버 금융/뉴스, Finnhub, 업비트)
//! - 시장별 `MarketDataSource` / `NewsSource` 구현
//! - 설정으로부터 시장에 맞는 소스를 만드는 팩토리 (`build_sources`)

pub mod error;
pub mod provider;
pub mod source;

pub use error::{DataError, Result};

// 시장별 소스 재내보내기
pub use source::{
    build_sources, CryptoSource, FinnhubNewsSource, KrStockSource, MarketSources,
    NaverNewsSource, UsStockSource, MAX_ARTICLES,
};
