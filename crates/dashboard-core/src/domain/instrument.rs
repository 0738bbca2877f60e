//! 종목 시세 및 분석 레코드.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Grade, SentimentLabel};
use crate::types::{Market, Percentage, Price};

/// 데이터 소스가 반환하는 원시 시세.
///
/// 밸류에이션 지표(`per`, `pbr`, `dividend_yield_pct`)의 `0`은
/// "제공되지 않음"을 뜻하는 센티널입니다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawQuote {
    /// 종목 코드/심볼
    pub symbol: String,
    /// 종목명 (없으면 심볼)
    pub display_name: String,
    /// 현재가
    pub price: Price,
    /// 52주 최고가
    pub high52: Price,
    /// 52주 최저가
    pub low52: Price,
    /// PER
    pub per: Decimal,
    /// PBR
    pub pbr: Decimal,
    /// 배당수익률 (%)
    pub dividend_yield_pct: Percentage,
    /// 24시간 변동률 (%), 암호화폐 전용
    pub change_pct_24h: Percentage,
    /// 뉴스 검색어 (한국주식은 종목명, 그 외는 심볼)
    pub news_query: String,
}

impl RawQuote {
    /// 심볼과 가격만으로 시세를 생성합니다. 고가/저가는 현재가로 채웁니다.
    pub fn new(symbol: impl Into<String>, price: Price) -> Self {
        let symbol = symbol.into();
        Self {
            display_name: symbol.clone(),
            news_query: symbol.clone(),
            symbol,
            price,
            high52: price,
            low52: price,
            ..Default::default()
        }
    }

    /// 종목명을 설정합니다.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// 52주 고저를 설정합니다.
    pub fn with_range(mut self, high52: Price, low52: Price) -> Self {
        self.high52 = high52;
        self.low52 = low52;
        self
    }

    /// 밸류에이션 지표를 설정합니다.
    pub fn with_valuation(mut self, per: Decimal, pbr: Decimal, dividend_yield_pct: Percentage) -> Self {
        self.per = per;
        self.pbr = pbr;
        self.dividend_yield_pct = dividend_yield_pct;
        self
    }

    /// 뉴스 검색어를 설정합니다.
    pub fn with_news_query(mut self, query: impl Into<String>) -> Self {
        self.news_query = query.into();
        self
    }
}

/// 분석 1회 실행에서 종목 하나에 대해 만들어지는 레코드.
///
/// 생성 이후 `grade`를 제외한 필드는 바뀌지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// 시장
    pub market: Market,
    /// 종목 코드/심볼
    pub symbol: String,
    /// 종목명
    pub display_name: String,
    /// 현재가
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Price,
    /// 52주 최고가
    #[serde(with = "rust_decimal::serde::float")]
    pub high52: Price,
    /// 52주 최저가
    #[serde(with = "rust_decimal::serde::float")]
    pub low52: Price,
    /// PER (0 = 제공되지 않음)
    #[serde(with = "rust_decimal::serde::float")]
    pub per: Decimal,
    /// PBR (0 = 제공되지 않음)
    #[serde(with = "rust_decimal::serde::float")]
    pub pbr: Decimal,
    /// 배당수익률 (%, 0 = 제공되지 않음)
    #[serde(with = "rust_decimal::serde::float")]
    pub dividend_yield_pct: Percentage,
    /// 24시간 변동률 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub change_pct_24h: Percentage,
    /// 고점 대비 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub drop_from_high_pct: Percentage,
    /// 상승여력 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub upside_pct: Percentage,
    /// 뉴스 감성 점수
    pub sentiment_score: i32,
    /// 뉴스 감성 라벨
    pub sentiment_label: SentimentLabel,
    /// 최근 뉴스 제목 (최대 3건)
    pub headlines: Vec<String>,
    /// 분석용 본문 (제목 + 요약)
    pub news_corpus: Vec<String>,
    /// 핵심 키워드 (최대 3개)
    pub keywords: Vec<String>,
    /// 투자 등급
    pub grade: Grade,
}

impl InstrumentRecord {
    /// 대표 뉴스 제목 (없으면 `None`).
    pub fn top_headline(&self) -> Option<&str> {
        self.headlines.first().map(String::as_str)
    }
}
