//! 종목 분석 실행.

use anyhow::{Context, Result};
use dashboard_analytics::{AnalysisRun, Analyzer, Session};
use dashboard_core::{parse_tickers, AppConfig, Market, PortfolioSettings, Thresholds};
use dashboard_data::build_sources;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;

use super::export::export_records;
use super::report::render_report;

/// 명령행에서 덮어쓰는 필터 기준.
#[derive(Debug, Clone, Default)]
pub struct ThresholdOverrides {
    /// PER 최대값
    pub max_per: Option<Decimal>,
    /// 최소 상승여력 (%)
    pub min_upside: Option<Decimal>,
    /// 최소 하락률 (%)
    pub min_drop: Option<Decimal>,
    /// 최소 배당률 (%)
    pub min_dividend: Option<Decimal>,
    /// 배당률 버블 크기 끄기
    pub no_dividend_size: bool,
}

impl ThresholdOverrides {
    /// 기준값에 덮어쓴 뒤 범위를 검증합니다.
    pub fn apply(&self, base: Thresholds) -> Result<Thresholds> {
        let thresholds = Thresholds {
            max_per: self.max_per.unwrap_or(base.max_per),
            min_upside_pct: self.min_upside.unwrap_or(base.min_upside_pct),
            min_drop_pct: self.min_drop.unwrap_or(base.min_drop_pct),
            min_dividend_pct: self.min_dividend.unwrap_or(base.min_dividend_pct),
            size_by_dividend: base.size_by_dividend && !self.no_dividend_size,
        };
        thresholds.validate().context("Invalid threshold")?;
        Ok(thresholds)
    }
}

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 분석 명령 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// 대상 시장
    pub market: Market,
    /// 쉼표로 구분된 종목 (없으면 저장된 설정 또는 기본 목록)
    pub tickers: Option<String>,
    /// 필터 기준 덮어쓰기
    pub overrides: ThresholdOverrides,
    /// 저장된 설정 불러오기
    pub load_settings: bool,
    /// 실행 후 현재 입력을 설정으로 저장
    pub save_settings: bool,
    /// 내보내기 파일 경로
    pub export: Option<PathBuf>,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 최종 분석 입력.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    /// 종목 입력 문자열 (설정 저장용)
    pub ticker_input: String,
    /// 파싱된 종목 목록
    pub tickers: Vec<String>,
    /// 필터 기준
    pub thresholds: Thresholds,
}

/// 명령행 값, 저장된 설정, 기본값 순으로 분석 입력을 결정합니다.
pub fn resolve_inputs(
    config: &AnalyzeConfig,
    saved: Option<&PortfolioSettings>,
) -> Result<ResolvedInputs> {
    let base = saved.map(PortfolioSettings::thresholds).unwrap_or_default();
    let thresholds = config.overrides.apply(base)?;

    let ticker_input = config
        .tickers
        .clone()
        .or_else(|| saved.map(|s| s.tickers.clone()))
        .filter(|t| !parse_tickers(t).is_empty())
        .unwrap_or_else(|| config.market.default_tickers().to_string());

    let tickers = parse_tickers(&ticker_input);
    if tickers.is_empty() {
        anyhow::bail!("No tickers to analyze");
    }

    Ok(ResolvedInputs {
        ticker_input,
        tickers,
        thresholds,
    })
}

/// 분석을 실행하고 결과를 출력/저장합니다.
pub async fn run_analyze(config: AnalyzeConfig, app: &AppConfig) -> Result<AnalysisRun> {
    let market = config.market;

    let saved = if config.load_settings {
        let saved = PortfolioSettings::load(&app.settings.dir, market)
            .context("Failed to load portfolio settings")?;
        if saved.is_none() {
            println!("저장된 {} 설정이 없어 기본값을 사용합니다.", market.display_name());
        }
        saved
    } else {
        None
    };

    let inputs = resolve_inputs(&config, saved.as_ref())?;

    if config.save_settings {
        let path = PortfolioSettings::new(inputs.ticker_input.as_str(), &inputs.thresholds)
            .save(&app.settings.dir, market)
            .context("Failed to save portfolio settings")?;
        println!("💾 설정 저장됨: {}", path.display());
    }

    let sources = build_sources(market, app)
        .with_context(|| format!("Failed to set up data sources for {}", market))?;

    info!(market = %market, tickers = ?inputs.tickers, "Running analysis");
    let analyzer = Analyzer::new(sources.quotes, sources.news)
        .with_request_delay(app.http.request_delay());
    let run = analyzer
        .run(&inputs.tickers, &inputs.thresholds)
        .await
        .context("Analysis failed")?;

    let session = Session::from_run(run.clone());
    present(&session, Some(&run), config.format, config.export.as_deref())?;

    Ok(run)
}

/// 세션을 출력하고, 경로가 있으면 내보냅니다.
pub fn present(
    session: &Session,
    run: Option<&AnalysisRun>,
    format: OutputFormat,
    export: Option<&std::path::Path>,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if session.is_empty() {
                println!("분석된 종목이 없습니다.");
                if let Some(run) = run {
                    print!("{}", super::report::format_problems(run));
                }
            } else {
                print!("{}", render_report(session, run));
            }
        }
        OutputFormat::Json => {
            let json = match run {
                Some(run) => serde_json::to_string_pretty(run),
                None => serde_json::to_string_pretty(session.records()),
            }
            .context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
    }

    if let Some(path) = export {
        let format = export_records(session.records(), path)?;
        // JSON 출력이 stdout을 쓰므로 안내는 stderr로
        eprintln!("📁 결과 저장됨 ({:?}): {}", format, path.display());
    }

    Ok(())
}
