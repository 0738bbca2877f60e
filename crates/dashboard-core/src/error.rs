//! 대시보드의 에러 타입.
//!
//! 이 모듈은 대시보드 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 대시보드 에러.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 파일 입출력 에러
    #[error("파일 입출력 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 대시보드 작업을 위한 Result 타입.
pub type DashboardResult<T> = Result<T, DashboardError>;

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for DashboardError {
    fn from(err: config::ConfigError) -> Self {
        DashboardError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::InvalidInput("max_per must be within 0..=50, got 80".to_string());
        assert_eq!(err.to_string(), "잘못된 입력: max_per must be within 0..=50, got 80");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DashboardError = parse_err.into();
        assert!(matches!(err, DashboardError::Serialization(_)));
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(matches!(err, DashboardError::Io(_)));
    }
}
