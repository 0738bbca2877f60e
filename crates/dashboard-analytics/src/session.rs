//! 분석 세션.
//!
//! 마지막 분석 결과를 보관하고, 필터 기준이 바뀌면 데이터를 다시 받지 않고
//! 등급만 재계산합니다.

use dashboard_core::{Grade, InstrumentRecord, Market, Thresholds};
use std::collections::BTreeMap;
use tracing::debug;

use crate::classifier::classify;
use crate::pipeline::AnalysisRun;

/// 분석 결과 세션.
#[derive(Debug, Clone)]
pub struct Session {
    market: Market,
    thresholds: Thresholds,
    records: Vec<InstrumentRecord>,
}

impl Session {
    /// 저장된 레코드로 세션을 만듭니다 (등급은 그대로 유지).
    pub fn new(market: Market, thresholds: Thresholds, records: Vec<InstrumentRecord>) -> Self {
        Self {
            market,
            thresholds,
            records,
        }
    }

    /// 분석 실행 결과로 세션을 만듭니다.
    pub fn from_run(run: AnalysisRun) -> Self {
        let market = run.market;
        let thresholds = run.thresholds.clone();
        Self::new(market, thresholds, run.into_records())
    }

    /// 대상 시장.
    pub fn market(&self) -> Market {
        self.market
    }

    /// 현재 필터 기준.
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// 입력 순서의 레코드.
    pub fn records(&self) -> &[InstrumentRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 새 기준으로 모든 레코드의 등급을 다시 매깁니다.
    pub fn regrade(&mut self, thresholds: Thresholds) {
        for record in &mut self.records {
            record.grade = classify(record, &thresholds);
        }
        debug!(market = %self.market, records = self.records.len(), "Regraded");
        self.thresholds = thresholds;
    }

    /// 등급 내림차순으로 정렬한 레코드 (같은 등급은 입력 순서 유지).
    pub fn ranked(&self) -> Vec<&InstrumentRecord> {
        let mut ranked: Vec<&InstrumentRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.grade.cmp(&a.grade));
        ranked
    }

    /// 등급별 종목 수 (높은 등급 먼저, 0건 포함).
    pub fn grade_counts(&self) -> Vec<(Grade, usize)> {
        let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.grade).or_default() += 1;
        }
        Grade::DESCENDING
            .iter()
            .map(|grade| (*grade, counts.get(grade).copied().unwrap_or(0)))
            .collect()
    }
}
