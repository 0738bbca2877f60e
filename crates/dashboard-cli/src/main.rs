//! 투자 대시보드 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 한국주식 기본 종목 분석
//! dashboard analyze -m kr
//!
//! # 미국주식, 필터 기준 지정 후 엑셀로 저장
//! dashboard analyze -m us -t "AAPL, MSFT, NVDA" --max-per 25 --min-upside 50 --export
//!
//! # 저장된 설정으로 암호화폐 분석, JSON 출력
//! dashboard analyze -m crypto --load-settings --format json
//!
//! # 내보낸 결과를 새 기준으로 재분류
//! dashboard regrade -i result.json --min-drop 20
//!
//! # 설정 저장/조회
//! dashboard settings save -m kr -t "005930, 000660" --min-dividend 3
//! dashboard settings show -m kr
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{error, info};

use dashboard_cli::commands::analyze::{run_analyze, AnalyzeConfig, OutputFormat, ThresholdOverrides};
use dashboard_cli::commands::export::DEFAULT_EXPORT_FILE;
use dashboard_cli::commands::regrade::{run_regrade, RegradeConfig};
use dashboard_cli::commands::settings::{format_settings, save_settings};
use dashboard_core::{init_logging, AppConfig, LogConfig, Market};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "투자 판단 대시보드 - 한국주식/미국주식/암호화폐 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// 필터 기준 (지정하지 않으면 저장된 설정 또는 기본값).
#[derive(Args, Debug, Clone, Default)]
struct ThresholdArgs {
    /// PER 최대값 (0~50, 기본 20)
    #[arg(long)]
    max_per: Option<Decimal>,

    /// 최소 상승여력 % (0~100, 기본 70)
    #[arg(long)]
    min_upside: Option<Decimal>,

    /// 고점 대비 최소 하락률 % (0~100, 기본 30)
    #[arg(long)]
    min_drop: Option<Decimal>,

    /// 최소 배당률 % (0~10, 기본 4.0)
    #[arg(long)]
    min_dividend: Option<Decimal>,

    /// 버블 차트에서 배당률 크기 표시 끄기
    #[arg(long)]
    no_dividend_size: bool,
}

impl From<ThresholdArgs> for ThresholdOverrides {
    fn from(args: ThresholdArgs) -> Self {
        Self {
            max_per: args.max_per,
            min_upside: args.min_upside,
            min_drop: args.min_drop,
            min_dividend: args.min_dividend,
            no_dividend_size: args.no_dividend_size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 분석 실행
    Analyze {
        /// 시장 (kr, us, crypto)
        #[arg(short, long)]
        market: Market,

        /// 종목 (쉼표 구분, 예: "005930, 000660")
        #[arg(short, long)]
        tickers: Option<String>,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// 저장된 설정 불러오기
        #[arg(long)]
        load_settings: bool,

        /// 현재 종목/기준을 설정으로 저장
        #[arg(long)]
        save_settings: bool,

        /// 결과 내보내기 (.xlsx, .csv, .json)
        #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        export: Option<PathBuf>,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 내보낸 JSON 결과를 새 기준으로 재분류
    Regrade {
        /// `analyze --export result.json`으로 만든 파일
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// 결과 내보내기 (.xlsx, .csv, .json)
        #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        export: Option<PathBuf>,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 포트폴리오 설정 관리
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// 설정 저장
    Save {
        /// 시장 (kr, us, crypto)
        #[arg(short, long)]
        market: Market,

        /// 종목 (쉼표 구분)
        #[arg(short, long)]
        tickers: Option<String>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// 저장된 설정 보기
    Show {
        /// 시장 (kr, us, crypto)
        #[arg(short, long)]
        market: Market,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app = AppConfig::load(&cli.config)?;
    init_logging(LogConfig::from_config(&app.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(config = %cli.config.display(), "Dashboard CLI started");

    match cli.command {
        Commands::Analyze {
            market,
            tickers,
            thresholds,
            load_settings,
            save_settings,
            export,
            format,
        } => {
            let config = AnalyzeConfig {
                market,
                tickers,
                overrides: thresholds.into(),
                load_settings,
                save_settings,
                export,
                format: OutputFormat::parse(&format)?,
            };

            match run_analyze(config, &app).await {
                Ok(run) => {
                    info!(
                        analyzed = run.records().count(),
                        failed = run.failed().count(),
                        "✅ Analysis completed"
                    );
                }
                Err(e) => {
                    error!("Analysis failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Regrade {
            input,
            thresholds,
            export,
            format,
        } => {
            let config = RegradeConfig {
                input,
                overrides: thresholds.into(),
                export,
                format: OutputFormat::parse(&format)?,
            };

            if let Err(e) = run_regrade(config) {
                error!("Regrade failed: {:#}", e);
                return Err(e);
            }
        }

        Commands::Settings { action } => match action {
            SettingsAction::Save {
                market,
                tickers,
                thresholds,
            } => {
                let path = save_settings(&app.settings.dir, market, tickers, &thresholds.into())?;
                println!("💾 설정 저장됨: {}", path.display());
            }
            SettingsAction::Show { market } => {
                println!("{}", format_settings(&app.settings.dir, market)?);
            }
        },
    }

    Ok(())
}
