//! Funding sheets: KPI snapshot and funding-round timeline.
//!
//! Both are straight projections of the sheet for charting; the only work done
//! here is number/date parsing of cells.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::parse_date;
use crate::source::types::{Row, Table};

pub const KPI_EMPTY_WARNING: &str = "No KPI data available. Check your 'funding_data_url' secret.";
pub const HISTORY_EMPTY_WARNING: &str =
    "No funding history data available. Check your 'funding_history_url' secret.";

/// One bar of a per-company chart. `value` is `None` when the cell is blank or not numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    pub company: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiNote {
    pub company: String,
    pub funding_rounds: Option<String>,
    pub investors: Option<String>,
    pub last_round_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub funding_raised: Vec<MetricPoint>,
    pub patents_filed: Vec<MetricPoint>,
    pub active_products: Vec<MetricPoint>,
    pub clinical_trials: Vec<MetricPoint>,
    pub notes: Vec<KpiNote>,
}

impl KpiSnapshot {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Build the four metric series and the notes table; rows without a company are skipped.
pub fn kpi_snapshot(table: &Table) -> KpiSnapshot {
    let mut snap = KpiSnapshot::default();
    for row in &table.rows {
        let Some(company) = row.get("Company") else {
            continue;
        };
        let point = |col: &str| MetricPoint {
            company: company.to_string(),
            value: number(row, col),
        };
        snap.funding_raised.push(point("Funding ($M)"));
        snap.patents_filed.push(point("Patents Filed"));
        snap.active_products.push(point("Active Products"));
        snap.clinical_trials.push(point("Clinical Trials"));
        snap.notes.push(KpiNote {
            company: company.to_string(),
            funding_rounds: text(row, "Funding Rounds"),
            investors: text(row, "Investors"),
            last_round_date: text(row, "Last Round Date"),
            notes: text(row, "Notes"),
        });
    }
    snap
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRound {
    pub company: String,
    pub date: NaiveDate,
    pub round: Option<String>,
    pub amount_musd: Option<f64>,
    pub investors: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FundingTimeline {
    pub rounds: Vec<FundingRound>,
    /// Rows skipped for a missing company or unparseable date.
    pub dropped: usize,
}

/// Rounds in sheet order.
pub fn funding_timeline(table: &Table) -> FundingTimeline {
    let mut tl = FundingTimeline::default();
    for row in &table.rows {
        let company = row.get("Company");
        let date = row.get("Date").and_then(parse_date);
        let (Some(company), Some(date)) = (company, date) else {
            tracing::debug!(target: "funding", ?company, raw_date = ?row.get("Date"), "skipping round");
            tl.dropped += 1;
            continue;
        };
        tl.rounds.push(FundingRound {
            company: company.to_string(),
            date,
            round: text(row, "Round"),
            amount_musd: number(row, "Amount ($M)"),
            investors: text(row, "Investors"),
            notes: text(row, "Notes"),
        });
    }
    tl
}

fn text(row: &Row, col: &str) -> Option<String> {
    row.get(col).map(str::to_string)
}

/// Lenient numeric cell: tolerates `$`, thousands separators and surrounding spaces.
fn number(row: &Row, col: &str) -> Option<f64> {
    let raw = row.get(col)?;
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
