//! # Dashboard Core
//!
//! 투자 판단 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 대시보드 전반에서 사용되는 기본 타입을 제공합니다:
//! - 시장 구분 (한국주식 / 미국주식 / 암호화폐)
//! - 종목 시세 및 분석 레코드, 투자 등급
//! - 시세/뉴스 데이터 소스 trait
//! - 필터 기준 및 포트폴리오 설정 저장
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod settings;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use settings::*;
pub use types::*;
