//! 뉴스 소스 (네이버 뉴스 검색, Finnhub 기업 뉴스).

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use dashboard_core::{NewsArticle, NewsSource, SourceError};

use super::{seoul_today, MAX_ARTICLES};
use crate::provider::{FinnhubClient, NaverNewsClient};

/// 네이버 뉴스 검색 소스 (한국주식, 암호화폐).
pub struct NaverNewsSource {
    client: NaverNewsClient,
}

impl NaverNewsSource {
    /// 새 소스를 생성합니다.
    pub fn new(client: NaverNewsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NewsSource for NaverNewsSource {
    fn source_name(&self) -> &str {
        "naver-news"
    }

    async fn fetch_news(&self, query: &str) -> Result<Vec<NewsArticle>, SourceError> {
        let mut articles = self.client.search(query, MAX_ARTICLES).await?;
        articles.truncate(MAX_ARTICLES);
        Ok(articles)
    }
}

/// 최근 기업 뉴스를 가져오는 기간 (일).
const LOOKBACK_DAYS: i64 = 3;

/// Finnhub 기업 뉴스 소스 (미국주식).
///
/// 최근 3일간의 기사 중 앞의 3건을 사용합니다.
pub struct FinnhubNewsSource {
    client: FinnhubClient,
    today: Option<NaiveDate>,
}

impl FinnhubNewsSource {
    /// 새 소스를 생성합니다.
    pub fn new(client: FinnhubClient) -> Self {
        Self { client, today: None }
    }

    /// 기준 날짜를 고정합니다 (테스트용).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

#[async_trait]
impl NewsSource for FinnhubNewsSource {
    fn source_name(&self) -> &str {
        "finnhub-news"
    }

    async fn fetch_news(&self, query: &str) -> Result<Vec<NewsArticle>, SourceError> {
        let to = self.today.unwrap_or_else(seoul_today);
        let from = to - Duration::days(LOOKBACK_DAYS);

        let items = self.client.company_news(query, from, to).await?;
        Ok(items
            .into_iter()
            .take(MAX_ARTICLES)
            .map(|item| NewsArticle::new(item.headline, item.summary))
            .collect())
    }
}
