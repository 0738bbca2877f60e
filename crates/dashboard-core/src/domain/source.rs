//! 시세/뉴스 데이터 소스 추상화.
//!
//! 시장별(한국주식, 미국주식, 암호화폐) 데이터 수집을 하나의 인터페이스로 묶어
//! 분석 파이프라인이 시장 분기 없이 동작하도록 합니다.

use async_trait::async_trait;
use thiserror::Error;

use super::{NewsArticle, RawQuote};
use crate::types::Market;

// =============================================================================
// 에러 타입
// =============================================================================

/// 데이터 소스 에러.
#[derive(Debug, Error)]
pub enum SourceError {
    /// 네트워크 에러 (타임아웃 포함)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 인증 실패
    #[error("인증 실패: {0}")]
    Authentication(String),

    /// API 에러
    #[error("API 에러: {0}")]
    Api(String),

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과")]
    RateLimited,

    /// 기타 에러
    #[error("기타 에러: {0}")]
    Other(String),
}

// =============================================================================
// MarketDataSource Trait
// =============================================================================

/// 시장별 시세 데이터 소스.
///
/// 종목 하나에 대해 현재가, 52주 고저, 밸류에이션 지표를 조회합니다.
///
/// # 반환값
///
/// - `Ok(Some(quote))`: 시세 조회 성공
/// - `Ok(None)`: 종목 없음, 시세 0, 빈 응답 등 "데이터 없음" (해당 종목은 건너뜀)
/// - `Err(...)`: 조회 중 에러 (분석 결과에 실패로 표시)
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 대상 시장.
    fn market(&self) -> Market;

    /// 소스 이름 (로깅용).
    fn source_name(&self) -> &str;

    /// 분석 실행 직전에 한 번 호출됩니다 (기준일 계산, 종목명 목록 적재 등).
    ///
    /// 기본 구현은 아무것도 하지 않습니다.
    async fn prepare(&self) -> Result<(), SourceError> {
        Ok(())
    }

    /// 종목 시세 조회.
    async fn fetch_instrument(&self, symbol: &str) -> Result<Option<RawQuote>, SourceError>;
}

// =============================================================================
// NewsSource Trait
// =============================================================================

/// 뉴스 검색 소스.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// 소스 이름 (로깅용).
    fn source_name(&self) -> &str;

    /// 검색어에 대한 최근 뉴스 (최대 3건).
    async fn fetch_news(&self, query: &str) -> Result<Vec<NewsArticle>, SourceError>;
}

// =============================================================================
// 테스트
// =============================================================================
