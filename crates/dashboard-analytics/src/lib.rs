//! 종목 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 뉴스 감성 점수 (사전 기반)
//! - 뉴스 핵심 키워드 추출
//! - 52주 범위 기반 파생 지표
//! - 투자 등급 분류
//! - 종목별 분석 파이프라인과 재분류 세션
//!
//! # Re-exports
//!
//! - [`pipeline`]: 분석 실행 (Analyzer, AnalysisRun, TickerOutcome)
//! - [`session`]: 결과 보관 및 재분류 (Session)

pub mod classifier;
pub mod keywords;
pub mod metrics;
pub mod pipeline;
pub mod sentiment;
pub mod session;

pub use classifier::{classify, score};
pub use keywords::{extract_keywords, MAX_KEYWORDS};
pub use metrics::{drop_from_high_pct, upside_pct};
pub use pipeline::{build_record, AnalysisError, AnalysisRun, Analyzer, TickerOutcome};
pub use sentiment::{score_article, score_articles, score_text};
pub use session::Session;
