//! 뉴스 기사 및 감성 결과.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 뉴스 기사 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsArticle {
    /// 제목 (마크업 제거됨)
    pub title: String,
    /// 요약/본문 (마크업 제거됨)
    pub body: String,
}

impl NewsArticle {
    /// 새 기사를 생성합니다.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// 분석용 텍스트 (`제목 요약`).
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// 감성 라벨 (점수의 부호).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// 긍정
    Positive,
    /// 부정
    Negative,
    /// 중립
    #[default]
    Neutral,
}

impl SentimentLabel {
    /// 점수로부터 라벨을 결정합니다.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s > 0 => SentimentLabel::Positive,
            s if s < 0 => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    /// 화면 표시용 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "🙂 긍정",
            SentimentLabel::Negative => "😟 부정",
            SentimentLabel::Neutral => "🧐 중립",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// 종목 하나에 대한 뉴스 수집 + 감성 분석 결과.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewsBundle {
    /// 표시용 제목 (최대 3건)
    pub headlines: Vec<String>,
    /// 분석용 텍스트 (제목 + 요약)
    pub corpus: Vec<String>,
    /// 감성 점수 합계
    pub score: i32,
    /// 감성 라벨
    pub label: SentimentLabel,
}

impl NewsBundle {
    /// 뉴스가 없거나 수집에 실패했을 때의 결과 (점수 0, 중립).
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_score() {
        assert_eq!(SentimentLabel::from_score(3), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-1), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0), SentimentLabel::Neutral);
    }

    #[test]
    fn test_analysis_text() {
        let article = NewsArticle::new("삼성전자 반등", "실적개선 기대");
        assert_eq!(article.analysis_text(), "삼성전자 반등 실적개선 기대");
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = NewsBundle::empty();
        assert!(bundle.headlines.is_empty());
        assert_eq!(bundle.score, 0);
        assert_eq!(bundle.label, SentimentLabel::Neutral);
    }
}
