//! 시장별 포트폴리오 설정 저장/불러오기.
//!
//! 설정은 `{dir}/portfolio_{kr|us|crypto}.json` 파일에 저장됩니다.
//! 키 이름(`tickers`, `max_per`, `min_up`, `min_drop`, `min_div`)은
//! 기존 대시보드가 만든 파일과 호환됩니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::Thresholds;
use crate::error::DashboardResult;
use crate::types::{parse_tickers, Market};

/// 저장되는 포트폴리오 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSettings {
    /// 입력한 그대로의 종목 문자열 (쉼표 구분)
    pub tickers: String,
    /// PER 최대값
    #[serde(with = "rust_decimal::serde::float")]
    pub max_per: Decimal,
    /// 최소 상승여력 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub min_up: Decimal,
    /// 최소 하락률 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub min_drop: Decimal,
    /// 최소 배당률 (%)
    #[serde(with = "rust_decimal::serde::float")]
    pub min_div: Decimal,
}

impl PortfolioSettings {
    /// 종목 문자열과 필터 기준으로 생성합니다.
    pub fn new(tickers: impl Into<String>, thresholds: &Thresholds) -> Self {
        Self {
            tickers: tickers.into(),
            max_per: thresholds.max_per,
            min_up: thresholds.min_upside_pct,
            min_drop: thresholds.min_drop_pct,
            min_div: thresholds.min_dividend_pct,
        }
    }

    /// 필터 기준으로 변환합니다.
    ///
    /// 배당률 버블 표시 옵션은 저장되지 않으므로 기본값(켜짐)을 사용합니다.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            max_per: self.max_per,
            min_upside_pct: self.min_up,
            min_drop_pct: self.min_drop,
            min_dividend_pct: self.min_div,
            ..Default::default()
        }
    }

    /// 파싱된 종목 목록 (입력 순서 유지).
    pub fn ticker_list(&self) -> Vec<String> {
        parse_tickers(&self.tickers)
    }

    /// 시장별 설정 파일 경로.
    pub fn path(dir: impl AsRef<Path>, market: Market) -> PathBuf {
        dir.as_ref().join(format!("portfolio_{}.json", market.key()))
    }

    /// 설정 파일을 저장합니다. 기존 파일은 덮어씁니다.
    pub fn save(&self, dir: impl AsRef<Path>, market: Market) -> DashboardResult<PathBuf> {
        let dir = dir.as_ref();
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }

        let path = Self::path(dir, market);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!(market = %market, path = %path.display(), "Portfolio settings saved");
        Ok(path)
    }

    /// 설정 파일을 불러옵니다.
    ///
    /// - 파일 없음 → `Ok(None)`
    /// - 내용이 손상됨 → 경고 로그 후 `Ok(None)`
    /// - 필터 기준이 범위를 벗어남 → 경고 로그 후 `Ok(None)`
    pub fn load(dir: impl AsRef<Path>, market: Market) -> DashboardResult<Option<Self>> {
        let path = Self::path(dir, market);
        if !path.exists() {
            debug!(path = %path.display(), "No saved settings");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<Self>(&content) {
            Ok(settings) => match settings.thresholds().validate() {
                Ok(()) => {
                    debug!(market = %market, tickers = %settings.tickers, "Portfolio settings loaded");
                    Ok(Some(settings))
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring out-of-range settings file");
                    Ok(None)
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed settings file");
                Ok(None)
            }
        }
    }
}
