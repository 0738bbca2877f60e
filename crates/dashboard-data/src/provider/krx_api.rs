//! KRX Open API 클라이언트.
//!
//! 한국거래소(KRX) Open API를 통해 국내 주식 데이터를 수집합니다.
//!
//! # 지원 데이터
//!
//! - 종목 기본 정보 (KOSPI / KOSDAQ 종목코드, 종목명)
//! - OHLCV 일별 시세
//!
//! # API 키
//!
//! 인증키는 `AUTH_KEY` HTTP 헤더로 전달합니다.
//! 설정의 `api.krx_api_key` 또는 환경변수 `KRX_API_KEY`에서 읽습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use dashboard_data::provider::krx_api::KrxApiClient;
//!
//! let client = KrxApiClient::new(http_client, "YOUR_AUTH_KEY");
//! let stocks = client.fetch_kospi_stocks("20250110").await?;
//! let candles = client.fetch_daily_ohlcv("005930", "20240110", "20250110").await?;
//! ```

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// KRX Open API 클라이언트.
#[derive(Clone)]
pub struct KrxApiClient {
    client: Client,
    auth_key: String,
    base_url: String,
}

/// KRX 종목 기본 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KrxStockInfo {
    /// 단축코드 (6자리)
    pub ticker: String,
    /// 종목명 (한글 약명)
    pub name: String,
    /// 시장 (STK: KOSPI, KSQ: KOSDAQ)
    pub market: String,
}

/// KRX OHLCV 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrxOhlcv {
    /// 일자
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: i64,
}

/// API 응답 래퍼.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(rename = "OutBlock_1")]
    out_block: Option<Vec<T>>,
}

/// 종목 기본 정보 원시 응답.
#[derive(Deserialize)]
struct RawStock {
    #[serde(rename = "ISU_SRT_CD")]
    ticker: String,
    #[serde(rename = "ISU_ABBRV")]
    name: String,
}

impl KrxApiClient {
    /// KRX Open API 기본 URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://data-dbg.krx.co.kr";

    /// 새로운 KRX API 클라이언트 생성.
    ///
    /// # Arguments
    /// * `client` - 공유 HTTP 클라이언트
    /// * `auth_key` - KRX Open API 인증키
    pub fn new(client: Client, auth_key: impl Into<String>) -> Self {
        Self {
            client,
            auth_key: auth_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 기본 URL 변경 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// API 요청 실행.
    ///
    /// AUTH_KEY는 HTTP 헤더로 전달합니다.
    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        api_id: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/svc/sample/apis/stk/{}", self.base_url, api_id);

        tracing::debug!(api_id = api_id, url = %url, "KRX API 요청");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("AUTH_KEY", &self.auth_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::from_status("KRX", status, body));
        }

        let data: ApiResponse<T> = response.json().await?;
        Ok(data.out_block.unwrap_or_default())
    }

    /// KOSPI 종목 기본 정보 조회.
    ///
    /// # Arguments
    /// * `base_date` - 기준일 (YYYYMMDD 형식)
    pub async fn fetch_kospi_stocks(&self, base_date: &str) -> Result<Vec<KrxStockInfo>> {
        let stocks = self
            .fetch_stocks("stk_isu_base_info", "STK", base_date)
            .await?;
        tracing::info!(count = stocks.len(), "KOSPI 종목 조회 완료");
        Ok(stocks)
    }

    /// KOSDAQ 종목 기본 정보 조회.
    ///
    /// # Arguments
    /// * `base_date` - 기준일 (YYYYMMDD 형식)
    pub async fn fetch_kosdaq_stocks(&self, base_date: &str) -> Result<Vec<KrxStockInfo>> {
        let stocks = self
            .fetch_stocks("ksq_isu_base_info", "KSQ", base_date)
            .await?;
        tracing::info!(count = stocks.len(), "KOSDAQ 종목 조회 완료");
        Ok(stocks)
    }

    async fn fetch_stocks(
        &self,
        api_id: &str,
        market: &str,
        base_date: &str,
    ) -> Result<Vec<KrxStockInfo>> {
        let raw: Vec<RawStock> = self.request(api_id, &[("basDd", base_date)]).await?;
        Ok(raw
            .into_iter()
            .map(|s| KrxStockInfo {
                ticker: s.ticker,
                name: s.name,
                market: market.to_string(),
            })
            .collect())
    }

    /// 종목별 일별 시세 조회.
    ///
    /// 결과는 일자 오름차순으로 정렬됩니다.
    ///
    /// # Arguments
    /// * `ticker` - 종목 코드
    /// * `start_date` - 시작일 (YYYYMMDD 형식)
    /// * `end_date` - 종료일 (YYYYMMDD 형식)
    pub async fn fetch_daily_ohlcv(
        &self,
        ticker: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<KrxOhlcv>> {
        #[derive(Deserialize)]
        struct RawOhlcv {
            #[serde(rename = "TRD_DD")]
            date: String,
            #[serde(rename = "TDD_OPNPRC", default)]
            open: Option<String>,
            #[serde(rename = "TDD_HGPRC", default)]
            high: Option<String>,
            #[serde(rename = "TDD_LWPRC", default)]
            low: Option<String>,
            #[serde(rename = "TDD_CLSPRC", default)]
            close: Option<String>,
            #[serde(rename = "ACC_TRDVOL", default)]
            volume: Option<String>,
        }

        let params = [
            ("isuCd", ticker),
            ("strtDd", start_date),
            ("endDd", end_date),
        ];
        let raw: Vec<RawOhlcv> = self.request("stk_isu_ohlcv", &params).await?;

        let mut ohlcvs: Vec<KrxOhlcv> = raw
            .into_iter()
            .filter_map(|o| {
                let date = parse_date_yyyymmdd(&o.date)?;
                Some(KrxOhlcv {
                    date,
                    open: parse_decimal_opt(&o.open).unwrap_or_default(),
                    high: parse_decimal_opt(&o.high).unwrap_or_default(),
                    low: parse_decimal_opt(&o.low).unwrap_or_default(),
                    close: parse_decimal_opt(&o.close).unwrap_or_default(),
                    volume: o
                        .volume
                        .as_ref()
                        .and_then(|v| v.replace(',', "").parse().ok())
                        .unwrap_or(0),
                })
            })
            .collect();
        ohlcvs.sort_by_key(|o| o.date);

        tracing::debug!(ticker = ticker, count = ohlcvs.len(), "일별 시세 조회 완료");
        Ok(ohlcvs)
    }
}

/// 문자열을 Decimal로 파싱 (쉼표, % 제거).
fn parse_decimal_opt(s: &Option<String>) -> Option<Decimal> {
    s.as_ref().and_then(|v| {
        let cleaned = v.replace(',', "").replace('%', "");
        cleaned.trim().parse().ok()
    })
}

/// YYYYMMDD 또는 YYYY/MM/DD 형식의 날짜 문자열을 NaiveDate로 파싱.
fn parse_date_yyyymmdd(s: &str) -> Option<NaiveDate> {
    if s.contains('/') {
        NaiveDate::parse_from_str(s, "%Y/%m/%d").ok()
    } else {
        NaiveDate::parse_from_str(s, "%Y%m%d").ok()
    }
}

/// NaiveDate를 KRX 요청 형식(YYYYMMDD)으로 변환.
pub fn format_krx_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(
            parse_decimal_opt(&Some("1,234.56".to_string())),
            Some(dec!(1234.56))
        );
        assert_eq!(parse_decimal_opt(&Some("12.34%".to_string())), Some(dec!(12.34)));
        assert_eq!(parse_decimal_opt(&Some("-".to_string())), None);
        assert_eq!(parse_decimal_opt(&None), None);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10);
        assert_eq!(parse_date_yyyymmdd("20250110"), expected);
        assert_eq!(parse_date_yyyymmdd("2025/01/10"), expected);
        assert_eq!(parse_date_yyyymmdd("2025-01"), None);
        assert_eq!(format_krx_date(expected.unwrap()), "20250110");
    }

    #[tokio::test]
    async fn test_fetch_kospi_stocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_base_info")
            .match_query(mockito::Matcher::UrlEncoded(
                "basDd".into(),
                "20250110".into(),
            ))
            .match_header("AUTH_KEY", "test-key")
            .with_status(200)
            .with_body(
                r#"{"OutBlock_1": [
                    {"ISU_SRT_CD": "005930", "ISU_ABBRV": "삼성전자", "MKT_TP_NM": "KOSPI"},
                    {"ISU_SRT_CD": "000660", "ISU_ABBRV": "SK하이닉스", "MKT_TP_NM": "KOSPI"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = KrxApiClient::new(Client::new(), "test-key").with_base_url(server.url());
        let stocks = client.fetch_kospi_stocks("20250110").await.unwrap();

        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].ticker, "005930");
        assert_eq!(stocks[0].name, "삼성전자");
        assert_eq!(stocks[0].market, "STK");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_daily_ohlcv_sorted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_ohlcv")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"OutBlock_1": [
                    {"TRD_DD": "2025/01/10", "TDD_OPNPRC": "54,000", "TDD_HGPRC": "55,100",
                     "TDD_LWPRC": "53,800", "TDD_CLSPRC": "54,900", "ACC_TRDVOL": "12,345,678"},
                    {"TRD_DD": "2025/01/09", "TDD_OPNPRC": "53,000", "TDD_HGPRC": "54,200",
                     "TDD_LWPRC": "52,900", "TDD_CLSPRC": "54,000", "ACC_TRDVOL": "9,876,543"},
                    {"TRD_DD": "invalid"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = KrxApiClient::new(Client::new(), "key").with_base_url(server.url());
        let candles = client
            .fetch_daily_ohlcv("005930", "20250109", "20250110")
            .await
            .unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].date, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        assert_eq!(candles[1].close, dec!(54900));
        assert_eq!(candles[1].volume, 12_345_678);
    }

    #[tokio::test]
    async fn test_missing_out_block_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/svc/sample/apis/stk/stk_isu_ohlcv")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"CURRENT_DATETIME": "20250111"}"#)
            .create_async()
            .await;

        let client = KrxApiClient::new(Client::new(), "key").with_base_url(server.url());
        let candles = client
            .fetch_daily_ohlcv("005930", "20250111", "20250111")
            .await
            .unwrap();
        assert!(candles.is_empty());
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/svc/sample/apis/stk/ksq_isu_base_info")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body("Unauthorized Key")
            .create_async()
            .await;

        let client = KrxApiClient::new(Client::new(), "bad").with_base_url(server.url());
        let err = client.fetch_kosdaq_stocks("20250110").await.unwrap_err();
        assert!(matches!(err, DataError::Api { status: 401, .. }));
    }
}
