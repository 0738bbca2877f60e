//! 분석 결과 내보내기 (xlsx, csv, json).

use anyhow::{Context, Result};
use dashboard_core::{DecimalExt, InstrumentRecord};
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// 기본 내보내기 파일 이름.
pub const DEFAULT_EXPORT_FILE: &str = "stock_analysis.xlsx";

/// 엑셀 시트 이름.
pub const SHEET_NAME: &str = "Result";

/// 내보내기 열 제목.
pub const EXPORT_HEADERS: [&str; 17] = [
    "종목",
    "기업명",
    "투자등급",
    "뉴스감성",
    "감성점수",
    "현재가",
    "52주 고점",
    "52주 저점",
    "PER",
    "PBR",
    "배당률 (%)",
    "24시간 변동률 (%)",
    "고점대비 (%)",
    "상승여력 (%)",
    "최근뉴스",
    "핵심키워드",
    "시장",
];

/// 내보내기 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// 파일 확장자로 형식을 결정합니다.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Unsupported export file: {}. Use .xlsx, .csv or .json",
                path.display()
            )),
        }
    }
}

/// 셀 값.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(Decimal),
}

impl Cell {
    fn as_csv(&self) -> String {
        match self {
            Cell::Text(text) => escape_csv(text),
            Cell::Number(value) => value.normalize().to_string(),
        }
    }
}

/// 레코드 한 건을 내보내기 행으로 변환합니다.
fn export_row(record: &InstrumentRecord) -> Vec<Cell> {
    vec![
        Cell::Text(record.symbol.clone()),
        Cell::Text(record.display_name.clone()),
        Cell::Text(record.grade.label().to_string()),
        Cell::Text(record.sentiment_label.label().to_string()),
        Cell::Number(Decimal::from(record.sentiment_score)),
        Cell::Number(record.price),
        Cell::Number(record.high52),
        Cell::Number(record.low52),
        Cell::Number(record.per),
        Cell::Number(record.pbr),
        Cell::Number(record.dividend_yield_pct),
        Cell::Number(record.change_pct_24h),
        Cell::Number(record.drop_from_high_pct),
        Cell::Number(record.upside_pct),
        Cell::Text(
            record
                .top_headline()
                .unwrap_or("최근 뉴스 없음")
                .to_string(),
        ),
        Cell::Text(if record.keywords.is_empty() {
            "데이터 없음".to_string()
        } else {
            record.keywords.join(", ")
        }),
        Cell::Text(record.market.key().to_string()),
    ]
}

/// 결과를 파일로 내보냅니다. 형식은 확장자로 결정합니다.
pub fn export_records(records: &[InstrumentRecord], path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    match format {
        ExportFormat::Xlsx => write_xlsx(records, path)?,
        ExportFormat::Csv => write_text(path, &format_csv(records))?,
        ExportFormat::Json => write_text(path, &format_json(records)?)?,
    }

    info!(path = %path.display(), records = records.len(), ?format, "Export written");
    Ok(format)
}

/// 엑셀 파일 작성 (시트 하나, 첫 행은 굵은 제목).
fn write_xlsx(records: &[InstrumentRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .context("Failed to name worksheet")?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .context("Failed to write header")?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, cell) in export_row(record).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => worksheet.write_string(row, col, text),
                Cell::Number(value) => worksheet.write_number(row, col, value.to_f64_lossy()),
            }
            .with_context(|| format!("Failed to write row {}", row))?;
        }
    }

    worksheet.autofit();
    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook: {}", path.display()))?;
    Ok(())
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    file.write_all(content.as_bytes())
        .context("Failed to write to file")?;
    Ok(())
}

/// CSV 형식.
pub fn format_csv(records: &[InstrumentRecord]) -> String {
    let mut output = String::new();

    output.push_str(
        &EXPORT_HEADERS
            .iter()
            .map(|h| escape_csv(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    output.push('\n');

    for record in records {
        let line: Vec<String> = export_row(record).iter().map(Cell::as_csv).collect();
        output.push_str(&line.join(","));
        output.push('\n');
    }

    output
}

/// JSON 형식 (레코드 배열). `regrade` 명령의 입력으로 다시 쓸 수 있습니다.
pub fn format_json(records: &[InstrumentRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize to JSON")
}

/// CSV 이스케이프 (콤마나 따옴표 포함 시 따옴표로 감싸기).
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
