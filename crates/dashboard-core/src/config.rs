//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 우선순위: 기본값 → 설정 파일(선택) → `DASHBOARD__*` 환경 변수 → API 키 전용 환경 변수.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DashboardResult;
use crate::types::Market;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 외부 API 인증 정보
    #[serde(default)]
    pub api: ApiConfig,
    /// HTTP 클라이언트 설정
    #[serde(default)]
    pub http: HttpConfig,
    /// 포트폴리오 설정 저장 위치
    #[serde(default)]
    pub settings: SettingsConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 외부 API 인증 정보.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    /// 네이버 검색 API Client ID
    #[serde(default)]
    pub naver_client_id: String,
    /// 네이버 검색 API Client Secret
    #[serde(default)]
    pub naver_client_secret: String,
    /// Finnhub API 토큰
    #[serde(default)]
    pub finnhub_api_key: String,
    /// KRX Open API 인증키
    #[serde(default)]
    pub krx_api_key: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(v: &str) -> &'static str {
            if v.is_empty() {
                "<unset>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("ApiConfig")
            .field("naver_client_id", &mask(&self.naver_client_id))
            .field("naver_client_secret", &mask(&self.naver_client_secret))
            .field("finnhub_api_key", &mask(&self.finnhub_api_key))
            .field("krx_api_key", &mask(&self.krx_api_key))
            .finish()
    }
}

impl ApiConfig {
    /// 설정에 비어 있는 키를 전용 환경 변수에서 채웁니다.
    ///
    /// `NAVER_CLIENT_ID`, `NAVER_CLIENT_SECRET`, `FINNHUB_API_KEY`, `KRX_API_KEY`
    pub fn fill_from_env(&mut self) {
        fill(&mut self.naver_client_id, "NAVER_CLIENT_ID");
        fill(&mut self.naver_client_secret, "NAVER_CLIENT_SECRET");
        fill(&mut self.finnhub_api_key, "FINNHUB_API_KEY");
        fill(&mut self.krx_api_key, "KRX_API_KEY");
    }

    /// 시장 분석에 필요한 키가 모두 있는지 확인하고, 없는 키 이름을 반환합니다.
    pub fn missing_keys(&self, market: Market) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match market {
            Market::Kr => {
                if self.krx_api_key.is_empty() {
                    missing.push("KRX_API_KEY");
                }
            }
            Market::Us => {
                if self.finnhub_api_key.is_empty() {
                    missing.push("FINNHUB_API_KEY");
                }
            }
            Market::Crypto => {}
        }
        missing
    }

    /// 네이버 뉴스 검색 키가 설정되어 있는지 여부.
    pub fn has_naver_news(&self) -> bool {
        !self.naver_client_id.is_empty() && !self.naver_client_secret.is_empty()
    }
}

fn fill(slot: &mut String, var: &str) {
    if slot.is_empty() {
        if let Ok(value) = std::env::var(var) {
            *slot = value;
        }
    }
}

/// HTTP 클라이언트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 종목 간 요청 딜레이 (밀리초), 0이면 딜레이 없음
    #[serde(default)]
    pub request_delay_ms: u64,
    /// 스크래핑용 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            request_delay_ms: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// 요청 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 종목 간 딜레이.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 포트폴리오 설정 저장 위치.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsConfig {
    /// 설정 파일 디렉토리
    #[serde(default = "default_settings_dir")]
    pub dir: PathBuf,
}

fn default_settings_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            dir: default_settings_dir(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("http.timeout_secs", default_timeout_secs())?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.api.fill_from_env();
        Ok(config)
    }
}
