//! 포트폴리오 설정 저장/조회.

use anyhow::{Context, Result};
use dashboard_core::{Market, PortfolioSettings};
use std::path::{Path, PathBuf};

use super::analyze::ThresholdOverrides;

/// 설정을 저장합니다.
///
/// 지정하지 않은 값은 기존 설정, 기존 설정이 없으면 기본값을 사용합니다.
pub fn save_settings(
    dir: &Path,
    market: Market,
    tickers: Option<String>,
    overrides: &ThresholdOverrides,
) -> Result<PathBuf> {
    let existing = PortfolioSettings::load(dir, market).context("Failed to read settings")?;

    let base = existing
        .as_ref()
        .map(PortfolioSettings::thresholds)
        .unwrap_or_default();
    let thresholds = overrides.apply(base)?;

    let tickers = tickers
        .or_else(|| existing.map(|s| s.tickers))
        .unwrap_or_else(|| market.default_tickers().to_string());

    PortfolioSettings::new(tickers, &thresholds)
        .save(dir, market)
        .context("Failed to save settings")
}

/// 저장된 설정을 보기 좋게 표시합니다.
pub fn format_settings(dir: &Path, market: Market) -> Result<String> {
    let path = PortfolioSettings::path(dir, market);
    let settings = PortfolioSettings::load(dir, market).context("Failed to read settings")?;

    let Some(settings) = settings else {
        return Ok(format!(
            "저장된 {} 설정이 없습니다 ({})",
            market.display_name(),
            path.display()
        ));
    };

    let mut output = format!("⚙️ {} 설정 ({})\n", market.display_name(), path.display());
    output.push_str(&format!("  종목: {}\n", settings.ticker_list().join(", ")));
    output.push_str(&format!("  PER 최대값: {}\n", settings.max_per));
    output.push_str(&format!("  최소 상승여력: {}%\n", settings.min_up));
    output.push_str(&format!("  최소 하락률: {}%\n", settings.min_drop));
    output.push_str(&format!("  최소 배당률: {}%\n", settings.min_div));
    Ok(output)
}
