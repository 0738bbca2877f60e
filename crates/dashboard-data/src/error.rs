//! 데이터 모듈 오류 타입.

use dashboard_core::SourceError;
use thiserror::Error;

/// 데이터 수집 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 요청 실패 (연결, 타임아웃, 본문 디코딩)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API가 성공이 아닌 상태 코드를 반환
    #[error("{provider} API error [{status}]: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// 요청 한도 초과 (HTTP 429)
    #[error("{0} rate limit exceeded")]
    RateLimited(&'static str),

    /// 응답 파싱 실패
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 설정 오류 (API 키 누락 등)
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl DataError {
    /// 응답 상태 코드로부터 오류를 만듭니다.
    pub(crate) fn from_status(
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    ) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return DataError::RateLimited(provider);
        }
        DataError::Api {
            provider,
            status: status.as_u16(),
            message: body,
        }
    }
}

impl From<DataError> for SourceError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Http(e) => SourceError::Network(e.to_string()),
            DataError::Api {
                provider,
                status: 401 | 403,
                message,
            } => SourceError::Authentication(format!("{}: {}", provider, message)),
            DataError::Api { .. } => SourceError::Api(err.to_string()),
            DataError::RateLimited(_) => SourceError::RateLimited,
            DataError::ParseError(msg) | DataError::SerializationError(msg) => {
                SourceError::Parse(msg)
            }
            DataError::ConfigError(msg) => SourceError::Other(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
