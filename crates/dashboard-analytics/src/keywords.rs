//! 뉴스 핵심 키워드 추출.
//!
//! 불용어와 종목명 조각을 걸러낸 뒤 빈도가 가장 높은 단어 3개를 고릅니다.

use dashboard_core::Market;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// 추출하는 최대 키워드 수.
pub const MAX_KEYWORDS: usize = 3;

/// 키워드 최소 길이 (문자 수).
const MIN_TOKEN_CHARS: usize = 3;

/// 종목명 조각 필터에 쓰는 최소 길이 (문자 수).
const MIN_NAME_FRAGMENT_CHARS: usize = 2;

/// 불용어 (한국어/영어 기능어 및 금융 뉴스 상투어).
const STOP_WORDS: &[&str] = &[
    // 한국어
    "이번엔", "달라", "스토리", "이슈들", "최대", "올해", "때문", "통해", "대해", "위해", "관련",
    "진행", "이후", "이상", "이하", "기대", "전망", "분석", "기사", "뉴스", "오늘", "등", "및",
    "위한", "기존", "확인", "중", "것", "이", "가", "에", "의", "를", "은", "는", "로", "으로",
    "과", "와", "도", "까지", "부터", "에서", "이다", "입니다", "하고", "종목", "주식", "코인",
    "시장", "투자", "투자자", "거래", "상승", "하락", "분기", "실적", "주가", "가격", "비중",
    "목표", "추천", "매수", "매도", "상황", "이유", "속보", "특징주", "전문가", "전략", "포인트",
    // 영어
    "the", "and", "for", "with", "from", "into", "during", "including", "until", "against",
    "among", "throughout", "despite", "towards", "upon", "concerning", "about", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "could", "would", "will", "also",
    "their", "this", "that", "its", "it", "to", "what", "which", "who", "whom", "whose", "when",
    "where", "why", "how", "than", "stock", "stocks", "market", "markets", "share", "shares",
    "price", "prices", "investing", "investor", "investors", "trading", "coin", "coins",
    "crypto", "cryptocurrency", "bitcoin", "ethereum", "daily", "report", "analysis",
    "forecast", "update", "today", "says", "said", "expected", "likely", "potential",
    "announced", "latest", "breaking", "news", "brief", "summary", "outlook",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// HTML 엔티티와 문장부호를 공백으로 바꾸는 정규식.
fn cleaners() -> Option<&'static (Regex, Regex)> {
    static RE: OnceLock<Option<(Regex, Regex)>> = OnceLock::new();
    RE.get_or_init(|| {
        let entity = Regex::new(r"&[a-z]+;").ok()?;
        let punctuation = Regex::new(r"[^\w\s]").ok()?;
        Some((entity, punctuation))
    })
    .as_ref()
}

/// 뉴스 본문에서 핵심 키워드를 추출합니다.
///
/// # 필터링
///
/// - 3글자 미만
/// - 숫자로만 된 단어
/// - 불용어
/// - 종목명(공백 기준 조각, 2글자 이상)을 포함하는 단어
///
/// 빈도 내림차순으로 최대 3개를 반환하며, 빈도가 같으면 먼저 나온 단어가 앞섭니다.
/// 미국 주식은 첫 글자만 대문자로 표시합니다.
pub fn extract_keywords<S: AsRef<str>>(texts: &[S], display_name: &str, market: Market) -> Vec<String> {
    let combined = texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let cleaned = match cleaners() {
        Some((entity, punctuation)) => {
            let without_entities = entity.replace_all(&combined, " ");
            punctuation.replace_all(&without_entities, " ").into_owned()
        }
        None => combined,
    };

    let name_lower = display_name.to_lowercase();
    let name_parts: Vec<&str> = name_lower
        .split_whitespace()
        .filter(|p| p.chars().count() >= MIN_NAME_FRAGMENT_CHARS)
        .collect();

    let stop_words = stop_words();

    // 첫 등장 순서를 유지하는 빈도 집계
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for word in cleaned.split_whitespace() {
        if word.chars().count() < MIN_TOKEN_CHARS
            || word.chars().all(char::is_numeric)
            || stop_words.contains(word)
            || name_parts.iter().any(|part| word.contains(part))
        {
            continue;
        }

        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<(usize, &str)> = order.into_iter().map(|w| (counts[w], w)).collect();
    // 안정 정렬: 빈도가 같으면 첫 등장 순서 유지
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(_, word)| match market {
            Market::Us => capitalize(word),
            _ => word.to_string(),
        })
        .collect()
}

/// 첫 글자는 대문자, 나머지는 소문자.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
