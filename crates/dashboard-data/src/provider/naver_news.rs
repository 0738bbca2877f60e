//! 네이버 뉴스 검색 API 클라이언트.
//!
//! `GET /v1/search/news.json?query=...&display=3&sort=sim`
//!
//! 인증은 `X-Naver-Client-Id` / `X-Naver-Client-Secret` 헤더로 전달합니다.
//! 응답의 `title`, `description`에는 `<b>` 같은 강조 마크업이 포함되어 있어
//! 태그를 제거한 뒤 반환합니다.

use dashboard_core::NewsArticle;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::error::{DataError, Result};

/// 검색 결과 한 건.
#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// 검색 응답.
#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    items: Vec<NewsItem>,
}

/// 네이버 뉴스 검색 클라이언트.
#[derive(Clone)]
pub struct NaverNewsClient {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

impl NaverNewsClient {
    /// 기본 URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://openapi.naver.com";

    /// 새 클라이언트를 생성합니다.
    pub fn new(
        client: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 기본 URL 변경 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 인증 정보가 설정되어 있는지 여부.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// 관련도순 뉴스 검색.
    ///
    /// # Arguments
    /// * `query` - 검색어 (한국주식은 종목명, 암호화폐는 심볼)
    /// * `display` - 최대 결과 수
    pub async fn search(&self, query: &str, display: usize) -> Result<Vec<NewsArticle>> {
        if !self.is_configured() {
            return Err(DataError::ConfigError(
                "NAVER_CLIENT_ID / NAVER_CLIENT_SECRET not set".to_string(),
            ));
        }

        let url = format!("{}/v1/search/news.json", self.base_url);
        let display = display.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("display", display.as_str()), ("sort", "sim")])
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::from_status("Naver Search", status, body));
        }

        let data: NewsResponse = response.json().await?;
        let articles: Vec<NewsArticle> = data
            .items
            .into_iter()
            .map(|item| NewsArticle::new(strip_markup(&item.title), strip_markup(&item.description)))
            .collect();

        tracing::debug!(query = query, count = articles.len(), "네이버 뉴스 검색 완료");
        Ok(articles)
    }
}

/// `<...>` 태그를 제거합니다.
pub fn strip_markup(text: &str) -> String {
    static TAG_RE: OnceLock<Option<Regex>> = OnceLock::new();
    match TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").ok()) {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_RESPONSE: &str = r#"{
        "lastBuildDate": "Mon, 13 Jan 2025 10:00:00 +0900",
        "total": 1520,
        "start": 1,
        "display": 2,
        "items": [
            {
                "title": "<b>삼성전자</b>, 실적개선 기대감에 반등",
                "originallink": "https://example.com/a",
                "link": "https://n.news.naver.com/a",
                "description": "<b>삼성전자</b> 주가가 신고가를 돌파했다",
                "pubDate": "Mon, 13 Jan 2025 09:30:00 +0900"
            },
            {
                "title": "반도체 업황 우려",
                "originallink": "https://example.com/b",
                "link": "https://n.news.naver.com/b",
                "description": "외국인 매도세 지속",
                "pubDate": "Mon, 13 Jan 2025 08:10:00 +0900"
            }
        ]
    }"#;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>삼성전자</b> 반등"), "삼성전자 반등");
        assert_eq!(strip_markup("태그 없음"), "태그 없음");
    }

    #[tokio::test]
    async fn test_search_parses_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/search/news.json")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("query".into(), "삼성전자".into()),
                mockito::Matcher::UrlEncoded("display".into(), "3".into()),
                mockito::Matcher::UrlEncoded("sort".into(), "sim".into()),
            ]))
            .match_header("X-Naver-Client-Id", "id")
            .match_header("X-Naver-Client-Secret", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SEARCH_RESPONSE)
            .create_async()
            .await;

        let client =
            NaverNewsClient::new(Client::new(), "id", "secret").with_base_url(server.url());
        let articles = client.search("삼성전자", 3).await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "삼성전자, 실적개선 기대감에 반등");
        assert_eq!(articles[0].body, "삼성전자 주가가 신고가를 돌파했다");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_without_credentials() {
        let client = NaverNewsClient::new(Client::new(), "", "");
        let err = client.search("BTC", 3).await.unwrap_err();
        assert!(matches!(err, DataError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_search_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/search/news.json")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"errorMessage":"Authentication failed","errorCode":"024"}"#)
            .create_async()
            .await;

        let client =
            NaverNewsClient::new(Client::new(), "bad", "bad").with_base_url(server.url());
        let err = client.search("BTC", 3).await.unwrap_err();
        assert!(matches!(err, DataError::Api { status: 401, .. }));
    }
}
