//! 네이버 금융 크롤러.
//!
//! 국내(KR) 주식의 밸류에이션 지표(PER, PBR, 배당수익률)를 네이버 금융
//! 종목 메인 페이지에서 수집합니다.
//!
//! ## 데이터 소스
//! - `/item/main.naver?code=...`: `em#_per`, `em#_pbr`, `em#_dvr`
//!
//! 값이 없거나 `N/A`이면 0으로 처리합니다 (0 = 제공되지 않음).
//!
//! ## 사용 예시
//! ```rust,ignore
//! let fetcher = NaverFinanceFetcher::new(client);
//! let valuation = fetcher.fetch_valuation("005930").await?;
//! println!("삼성전자 PER: {}", valuation.per);
//! ```

use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use thiserror::Error;

/// 네이버 금융 크롤러 에러
#[derive(Debug, Error)]
pub enum NaverError {
    #[error("HTTP 요청 실패: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTML 파싱 실패: {0}")]
    ParseError(String),

    #[error("데이터 없음: {ticker}")]
    NoData { ticker: String },

    #[error("Rate limit 초과")]
    RateLimited,
}

impl From<NaverError> for crate::error::DataError {
    fn from(err: NaverError) -> Self {
        match err {
            NaverError::HttpError(e) => crate::error::DataError::Http(e),
            NaverError::RateLimited => crate::error::DataError::RateLimited("Naver Finance"),
            other => crate::error::DataError::ParseError(other.to_string()),
        }
    }
}

/// 네이버 금융 밸류에이션 지표.
///
/// 모든 값은 "제공되지 않음"일 때 0입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NaverValuation {
    /// PER (주가수익비율)
    pub per: Decimal,
    /// PBR (주가순자산비율)
    pub pbr: Decimal,
    /// 배당수익률 (%)
    pub dividend_yield: Decimal,
}

/// 네이버 금융 크롤러
///
/// HTML 파싱을 통해 네이버 금융에서 밸류에이션 지표를 수집합니다.
#[derive(Clone)]
pub struct NaverFinanceFetcher {
    client: Client,
    base_url: String,
}

impl NaverFinanceFetcher {
    /// 기본 URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://finance.naver.com";

    /// 공유 HTTP 클라이언트로 생성
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 기본 URL 변경 (테스트용)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 종목 메인 페이지에서 PER/PBR/배당수익률 수집
    ///
    /// # Arguments
    /// * `ticker` - 종목 코드 (예: "005930")
    pub async fn fetch_valuation(&self, ticker: &str) -> Result<NaverValuation, NaverError> {
        let url = format!("{}/item/main.naver", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("code", ticker)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NaverError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(NaverError::NoData {
                ticker: ticker.to_string(),
            });
        }

        let html = response.text().await?;
        let valuation = parse_valuation(&html);

        tracing::debug!(
            ticker = ticker,
            per = %valuation.per,
            pbr = %valuation.pbr,
            dividend_yield = %valuation.dividend_yield,
            "네이버 금융 지표 추출 완료"
        );
        Ok(valuation)
    }
}

/// 종목 메인 페이지 HTML에서 밸류에이션 지표를 추출합니다.
///
/// 배당수익률은 `em#_dvr`이 없으면 "배당수익률" 라벨 뒤 첫 `<em>`을 사용합니다.
pub fn parse_valuation(html: &str) -> NaverValuation {
    let document = Html::parse_document(html);

    let per = extract_text_by_id(&document, "_per")
        .map(|t| parse_ratio(&t))
        .unwrap_or_default();
    let pbr = extract_text_by_id(&document, "_pbr")
        .map(|t| parse_ratio(&t))
        .unwrap_or_default();
    let dividend_yield = extract_text_by_id(&document, "_dvr")
        .or_else(|| extract_dividend_after_label(html))
        .map(|t| parse_ratio(&t))
        .unwrap_or_default();

    NaverValuation {
        per,
        pbr,
        dividend_yield,
    }
}

/// ID로 `<em>` 요소의 텍스트 추출
fn extract_text_by_id(document: &Html, id: &str) -> Option<String> {
    let selector = Selector::parse(&format!("em#{}", id)).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// "배당수익률" 라벨 뒤 첫 `<em>` 텍스트 추출
fn extract_dividend_after_label(html: &str) -> Option<String> {
    static DIVIDEND_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = DIVIDEND_RE
        .get_or_init(|| Regex::new(r"(?s)배당수익률.*?<em[^>]*>(.+?)</em>").ok())
        .as_ref()?;

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 지표 텍스트를 Decimal로 파싱
///
/// - 비어 있거나 `N/A`를 포함하면 0
/// - 숫자, 소수점 외 문자(쉼표, `%`, 배수 표기, 부호 등)는 제거하므로 항상 0 이상
/// - 파싱 실패 시 0
fn parse_ratio(text: &str) -> Decimal {
    let text = text.trim();
    if text.is_empty() || text.to_uppercase().contains("N/A") {
        return Decimal::ZERO;
    }

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    cleaned.parse().unwrap_or(Decimal::ZERO)
}
