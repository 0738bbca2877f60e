//! 투자 대시보드 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 종목 분석 실행 및 리포트 출력
//! - 결과 내보내기 (xlsx, csv, json)
//! - 저장된 결과 재분류
//! - 포트폴리오 설정 관리

pub mod commands;
