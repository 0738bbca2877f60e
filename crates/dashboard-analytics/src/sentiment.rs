//! 뉴스 감성 점수 계산기.
//!
//! 사전 기반 키워드 카운팅 방식입니다. 기사마다 제목과 요약을 이어 붙여 소문자로
//! 바꾼 뒤, 긍정 사전의 각 단어가 **부분 문자열로** 포함되어 있으면 +1,
//! 부정 사전의 각 단어가 포함되어 있으면 -1을 더합니다.
//!
//! - 같은 단어가 여러 번 나와도 기사당 한 번만 셉니다.
//! - 단어 경계를 보지 않으므로 `"upgrade"`는 `"up"`과 일치합니다.
//! - 종목 점수는 기사 점수의 합계입니다.

use dashboard_core::{NewsArticle, NewsBundle, SentimentLabel};

/// 한국어 긍정 단어.
pub const POSITIVE_KO: [&str; 14] = [
    "상승", "돌파", "수익", "호재", "성장", "매수", "긍정", "신고가", "최고", "증가", "성공",
    "반등", "실적개선", "우수",
];

/// 한국어 부정 단어.
pub const NEGATIVE_KO: [&str; 13] = [
    "하락", "감소", "악재", "손실", "우려", "매도", "부정", "급락", "쇼크", "폭락", "실패",
    "약세", "부진",
];

/// 영어 긍정 단어.
pub const POSITIVE_EN: [&str; 13] = [
    "up", "rise", "growth", "gain", "positive", "buy", "bullish", "high", "jump", "surpass",
    "beat", "success", "dividend",
];

/// 영어 부정 단어.
pub const NEGATIVE_EN: [&str; 13] = [
    "down", "fall", "loss", "drop", "negative", "sell", "bearish", "low", "slump", "miss",
    "fail", "concern", "risk",
];

/// 텍스트 하나의 감성 점수.
pub fn score_text(text: &str) -> i32 {
    let lower = text.to_lowercase();

    let positive = POSITIVE_KO
        .iter()
        .chain(POSITIVE_EN.iter())
        .filter(|w| lower.contains(*w))
        .count() as i32;
    let negative = NEGATIVE_KO
        .iter()
        .chain(NEGATIVE_EN.iter())
        .filter(|w| lower.contains(*w))
        .count() as i32;

    positive - negative
}

/// 기사 한 건의 감성 점수 (제목 + 요약).
pub fn score_article(article: &NewsArticle) -> i32 {
    score_text(&format!("{}{}", article.title, article.body))
}

/// 기사 목록으로 뉴스 번들을 만듭니다.
///
/// 표시용 제목, 키워드 추출용 본문, 점수 합계와 라벨을 채웁니다.
pub fn score_articles(articles: &[NewsArticle]) -> NewsBundle {
    let score = articles.iter().map(score_article).sum();

    NewsBundle {
        headlines: articles.iter().map(|a| a.title.clone()).collect(),
        corpus: articles.iter().map(NewsArticle::analysis_text).collect(),
        score,
        label: SentimentLabel::from_score(score),
    }
}
