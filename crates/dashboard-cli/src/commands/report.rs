//! 분석 결과 리포트 (표, 요약 카드, 텍스트 차트).

use dashboard_analytics::{AnalysisRun, Session};
use dashboard_core::{DecimalExt, InstrumentRecord, Market};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// 차트 격자 너비 (문자 수).
const CHART_WIDTH: usize = 60;
/// 차트 격자 높이 (행 수).
const CHART_HEIGHT: usize = 16;
/// 막대 차트 최대 길이.
const BAR_WIDTH: usize = 40;

/// 전체 리포트 (표 → 요약 카드 → 버블 차트 → 하락폭 막대 → 실패 목록).
pub fn render_report(session: &Session, run: Option<&AnalysisRun>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "📋 종합 투자 분석 표 ({})\n\n",
        session.market().display_name()
    ));
    output.push_str(&format_table(session.records(), session.market()));

    let counts: Vec<String> = session
        .grade_counts()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(grade, count)| format!("{} {}", grade.label(), count))
        .collect();
    if !counts.is_empty() {
        output.push_str(&format!("\n등급 분포: {}\n", counts.join(" | ")));
    }

    output.push_str("\n🧠 투자 요약\n\n");
    output.push_str(&format_summary_cards(&session.ranked()));

    output.push_str("\n📈 투자 지표 대시보드\n\n");
    output.push_str(&format_bubble_chart(
        session.records(),
        session.market(),
        session.thresholds().size_by_dividend,
    ));

    output.push_str("\n📉 종목별 고점 대비 하락폭\n\n");
    output.push_str(&format_drop_bars(session.records()));

    if let Some(run) = run {
        output.push_str(&format_problems(run));
    }

    output
}

/// 결과 표.
///
/// PER/PBR/배당률의 0은 `N/A`로 표시하고, 한국주식 가격은 정수로 표시합니다.
pub fn format_table(records: &[InstrumentRecord], market: Market) -> String {
    let show_change = market == Market::Crypto;
    let mut output = String::new();

    let mut header = format!(
        "{:<10} {:<16} {:<18} {:<6} {:>14} {:>14} {:>8} {:>8} {:>8}",
        "종목", "기업명", "투자등급", "뉴스감성", "현재가", "52주 고점", "PER", "PBR", "배당률(%)"
    );
    if show_change {
        header.push_str(&format!(" {:>10}", "24h(%)"));
    }
    header.push_str(&format!(
        " {:>10} {:>10}  {}",
        "고점대비(%)", "상승여력(%)", "핵심키워드"
    ));
    output.push_str(&header);
    output.push('\n');
    output.push_str(&"-".repeat(150));
    output.push('\n');

    for record in records {
        let mut line = format!(
            "{:<10} {:<16} {:<18} {:<6} {:>14} {:>14} {:>8} {:>8} {:>8}",
            record.symbol,
            truncate(&record.display_name, 16),
            record.grade.label(),
            record.sentiment_label.label(),
            format_price(record.price, market),
            format_price(record.high52, market),
            format_optional(record.per),
            format_optional(record.pbr),
            format_optional(record.dividend_yield_pct),
        );
        if show_change {
            line.push_str(&format!(" {:>10}", format_fixed(record.change_pct_24h)));
        }
        line.push_str(&format!(
            " {:>10} {:>10}  {}",
            format_fixed(record.drop_from_high_pct),
            format_fixed(record.upside_pct),
            keywords_text(record),
        ));
        output.push_str(&line);
        output.push('\n');
    }

    output.push_str(&format!("\nTotal: {} instruments\n", records.len()));
    output
}

/// 종목별 요약 카드 (입력 순서 그대로 출력하므로 정렬은 호출 측 책임).
pub fn format_summary_cards(records: &[&InstrumentRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!(
            "📌 {} ({}) | {}\n",
            record.display_name,
            record.symbol,
            record.sentiment_label.label()
        ));
        output.push_str(&format!("   🏷️ 주요 키워드: {}\n", keywords_text(record)));
        output.push_str(&format!(
            "   📰 {}\n",
            record.top_headline().unwrap_or("최근 뉴스 없음")
        ));
        output.push_str(&format!(
            "   현재가: {} | 상승여력: {}% | 등급: {}\n\n",
            format_price(record.price, record.market),
            format_fixed(record.upside_pct),
            record.grade.label()
        ));
    }

    output
}

/// 상승여력 버블 차트 (텍스트).
///
/// x축은 PER (암호화폐는 24시간 변동률), y축은 상승여력입니다.
/// 배당률 크기 옵션이 켜져 있으면 배당률에 따라 마커가 커집니다 (`.` < `o` < `O` < `@`).
pub fn format_bubble_chart(records: &[InstrumentRecord], market: Market, size_by_dividend: bool) -> String {
    if records.is_empty() {
        return "(데이터 없음)\n".to_string();
    }

    let (title, x_title) = if market == Market::Crypto {
        ("암호화폐 변동성 대비 상승여력 분석", "24시간 변동률 (%)")
    } else {
        ("PER 대비 상승여력 분석 (버블 크기: 배당률)", "PER (주가수익비율)")
    };

    let x_of = |r: &InstrumentRecord| {
        if market == Market::Crypto {
            r.change_pct_24h
        } else {
            r.per
        }
    };

    let (x_min, x_max) = padded_domain(records.iter().map(x_of));
    let (y_min, y_max) = padded_domain(records.iter().map(|r| r.upside_pct));
    let max_dividend = records
        .iter()
        .map(|r| r.dividend_yield_pct)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut grid = vec![vec![' '; CHART_WIDTH]; CHART_HEIGHT];
    for record in records {
        let col = scale(x_of(record), x_min, x_max, CHART_WIDTH);
        // 위쪽이 큰 값
        let row = CHART_HEIGHT - 1 - scale(record.upside_pct, y_min, y_max, CHART_HEIGHT);
        grid[row][col] = bubble_marker(record.dividend_yield_pct, max_dividend, size_by_dividend);
    }

    let mut output = format!("{}\n", title);
    output.push_str(&format!("{:>9} ┐\n", format_fixed(y_max)));
    for row in grid {
        let line: String = row.into_iter().collect();
        output.push_str(&format!("{:>9} │{}\n", "", line));
    }
    output.push_str(&format!("{:>9} └{}\n", format_fixed(y_min), "─".repeat(CHART_WIDTH)));
    output.push_str(&format!(
        "{:>10} {:<width$}{}\n",
        "",
        format_fixed(x_min),
        format_fixed(x_max),
        width = CHART_WIDTH - 8
    ));
    output.push_str(&format!("x: {} / y: 상승여력 (%)\n\n", x_title));

    for record in records {
        output.push_str(&format!(
            "  {} {} ({}) x={} y={} 배당률={} {}\n",
            bubble_marker(record.dividend_yield_pct, max_dividend, size_by_dividend),
            record.display_name,
            record.symbol,
            format_fixed(x_of(record)),
            format_fixed(record.upside_pct),
            format_optional(record.dividend_yield_pct),
            record.grade.label()
        ));
    }

    output
}

/// 고점 대비 하락폭 막대 차트 (하락폭이 큰 종목부터).
pub fn format_drop_bars(records: &[InstrumentRecord]) -> String {
    let mut sorted: Vec<&InstrumentRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.drop_from_high_pct.cmp(&b.drop_from_high_pct));

    let max_abs = sorted
        .iter()
        .map(|r| r.drop_from_high_pct.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut output = String::new();
    for record in sorted {
        let length = if max_abs.is_zero() {
            0
        } else {
            (record.drop_from_high_pct.abs() / max_abs * Decimal::from(BAR_WIDTH))
                .round()
                .to_f64_lossy() as usize
        };
        output.push_str(&format!(
            "{:<16} {:>9} {}\n",
            truncate(&record.display_name, 16),
            format_fixed(record.drop_from_high_pct),
            "█".repeat(length)
        ));
    }
    output
}

/// 건너뛴 종목과 실패한 종목 목록.
pub fn format_problems(run: &AnalysisRun) -> String {
    let mut output = String::new();

    let skipped: Vec<_> = run.skipped().collect();
    if !skipped.is_empty() {
        output.push_str("\n⚠️ 건너뛴 종목\n");
        for (symbol, reason) in skipped {
            output.push_str(&format!("  {}: {}\n", symbol, reason));
        }
    }

    let failed: Vec<_> = run.failed().collect();
    if !failed.is_empty() {
        output.push_str("\n❌ 실패한 종목\n");
        for (symbol, error) in failed {
            output.push_str(&format!("  {} 실패: {}\n", symbol, error));
        }
    }

    output
}

/// 가격 표시 (한국주식은 정수, 그 외 소수점 2자리, 천 단위 구분).
pub fn format_price(value: Decimal, market: Market) -> String {
    if market.integer_prices() {
        group_thousands(
            &value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_string(),
        )
    } else {
        group_thousands(&format_fixed(value))
    }
}

/// 소수점 2자리 고정 표시.
pub fn format_fixed(value: Decimal) -> String {
    format!("{:.2}", value.round2())
}

/// 0이면 `N/A`, 아니면 소수점 2자리.
pub fn format_optional(value: Decimal) -> String {
    if value.is_zero() {
        "N/A".to_string()
    } else {
        format_fixed(value)
    }
}

/// 핵심 키워드 표시 (없으면 "데이터 없음").
pub fn keywords_text(record: &InstrumentRecord) -> String {
    if record.keywords.is_empty() {
        "데이터 없음".to_string()
    } else {
        record.keywords.join(", ")
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// 최소/최대에 15% 여백을 둔 축 범위. 값이 모두 같으면 ±5.
fn padded_domain(values: impl Iterator<Item = Decimal>) -> (Decimal, Decimal) {
    let values: Vec<Decimal> = values.collect();
    let min = values.iter().copied().min().unwrap_or(Decimal::ZERO);
    let max = values.iter().copied().max().unwrap_or(Decimal::ZERO);
    let margin = if max == min {
        dec!(5)
    } else {
        (max - min) * dec!(0.15)
    };
    (min - margin, max + margin)
}

/// 값을 `0..cells` 격자 위치로 변환.
fn scale(value: Decimal, min: Decimal, max: Decimal, cells: usize) -> usize {
    let span = max - min;
    if span <= Decimal::ZERO {
        return 0;
    }
    let ratio = ((value - min) / span).max(Decimal::ZERO).min(Decimal::ONE);
    let position = (ratio * Decimal::from(cells - 1)).round().to_f64_lossy() as usize;
    position.min(cells - 1)
}

fn bubble_marker(dividend: Decimal, max_dividend: Decimal, enabled: bool) -> char {
    if !enabled {
        return 'o';
    }
    if dividend <= Decimal::ZERO || max_dividend <= Decimal::ZERO {
        return '.';
    }
    let ratio = dividend / max_dividend;
    if ratio < dec!(0.34) {
        'o'
    } else if ratio < dec!(0.67) {
        'O'
    } else {
        '@'
    }
}

/// 문자열 자르기 (UTF-8 안전).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
