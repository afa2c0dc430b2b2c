//! # Aggregation Engine
//!
//! Pure views over the in-memory collection. Nothing here is stored; every
//! view is recomputed from the current snapshot.
//!
//! ## View Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  records ──┬──► totals()             grand totals, all years            │
//! │            │                                                            │
//! │            ├──► monthly_summaries()  12 entries for the tracked year    │
//! │            │         │                                                  │
//! │            │         └──► quarterly_totals()  T1..T4 (net)              │
//! │            │                   │                                        │
//! │            │                   └──► quarterly_shares()  pie slices      │
//! │            │                                                            │
//! │            ├──► weekly_buckets()     ≤ 12 "<mois> S<n>" buckets         │
//! │            │                                                            │
//! │            └──► recent_sales()       last 10, newest first              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use ts_rs::TS;

use crate::calendar::{weekly_key, MONTH_NAMES, QUARTER_LABELS};
use crate::types::{
    MonthlySummary, QuarterShare, QuarterlyTotal, SaleRecord, SalesSnapshot, Totals, WeeklyBucket,
};
use crate::{RECENT_SALES_LIMIT, WEEKLY_BUCKET_LIMIT};

/// Returns the record stored for `date`.
///
/// The store keys records by date so duplicates cannot occur; if a
/// hand-built collection holds some anyway, the first match wins.
pub fn find_by_date(records: &[SaleRecord], date: NaiveDate) -> Option<&SaleRecord> {
    records.iter().find(|record| record.date == date)
}

/// Computes the 12 monthly summaries of `year`, January first.
///
/// Months without records are present with zero totals. Records from other
/// years are ignored.
pub fn monthly_summaries(records: &[SaleRecord], year: i32) -> Vec<MonthlySummary> {
    let mut summaries: Vec<MonthlySummary> = MONTH_NAMES
        .iter()
        .map(|name| MonthlySummary {
            month: (*name).to_string(),
            total: 0.0,
            net_total: 0.0,
            honoraire_total: 0.0,
            days: 0,
        })
        .collect();

    for record in records.iter().filter(|r| r.date.year() == year) {
        let summary = &mut summaries[record.date.month0() as usize];
        summary.total += record.amount;
        summary.net_total += record.net_amount;
        summary.honoraire_total += record.honoraire_amount;
        summary.days += 1;
    }

    summaries
}

/// Groups records into weekly chart buckets.
///
/// Buckets keep first-seen order (store order, not necessarily
/// chronological) and only the first [`WEEKLY_BUCKET_LIMIT`] are returned.
/// The cap is applied after accumulation, so a late record still adds to an
/// early bucket.
pub fn weekly_buckets(records: &[SaleRecord]) -> Vec<WeeklyBucket> {
    let mut buckets: Vec<WeeklyBucket> = Vec::new();

    for record in records {
        let key = weekly_key(record.date);
        let index = match buckets.iter().position(|b| b.week == key) {
            Some(index) => index,
            None => {
                buckets.push(WeeklyBucket {
                    week: key,
                    gross: 0.0,
                    net: 0.0,
                });
                buckets.len() - 1
            }
        };
        buckets[index].gross += record.amount;
        buckets[index].net += record.net_amount;
    }

    buckets.truncate(WEEKLY_BUCKET_LIMIT);
    buckets
}

/// Sums monthly net totals per quarter. Always 4 entries.
///
/// Expects the 12 entries of [`monthly_summaries`]; missing months count
/// as zero.
pub fn quarterly_totals(monthly: &[MonthlySummary]) -> Vec<QuarterlyTotal> {
    QUARTER_LABELS
        .iter()
        .enumerate()
        .map(|(quarter, name)| QuarterlyTotal {
            name: (*name).to_string(),
            value: monthly
                .iter()
                .skip(quarter * 3)
                .take(3)
                .map(|m| m.net_total)
                .sum(),
        })
        .collect()
}

/// Attaches each quarter's percentage of the yearly net total.
pub fn quarterly_shares(quarters: &[QuarterlyTotal]) -> Vec<QuarterShare> {
    let year_total: f64 = quarters.iter().map(|q| q.value).sum();

    quarters
        .iter()
        .map(|q| QuarterShare {
            name: q.name.clone(),
            value: q.value,
            percent: if year_total > 0.0 {
                q.value / year_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// True when at least one quarter has a positive net total.
///
/// The pie chart is hidden otherwise.
pub fn has_quarterly_data(quarters: &[QuarterlyTotal]) -> bool {
    quarters.iter().any(|q| q.value > 0.0)
}

/// Grand totals over every record, all years included.
pub fn totals(records: &[SaleRecord]) -> Totals {
    records.iter().fold(
        Totals {
            days_with_sales: records.len() as u32,
            ..Totals::default()
        },
        |mut acc, record| {
            acc.total += record.amount;
            acc.net_total += record.net_amount;
            acc.honoraire_total += record.honoraire_amount;
            acc
        },
    )
}

/// The last `limit` records of the collection, newest-stored first.
pub fn recent_sales(records: &[SaleRecord], limit: usize) -> Vec<SaleRecord> {
    records.iter().rev().take(limit).cloned().collect()
}

// =============================================================================
// Dashboard
// =============================================================================

/// Every view the dashboard renders, computed in one pass over a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Dashboard {
    /// Tracked year for monthly / quarterly views.
    pub year: i32,

    /// Grand totals.
    pub totals: Totals,

    /// 12 monthly summaries.
    pub monthly: Vec<MonthlySummary>,

    /// Weekly chart buckets (≤ 12).
    pub weekly: Vec<WeeklyBucket>,

    /// T1..T4 with pie shares.
    pub quarterly: Vec<QuarterShare>,

    /// Whether the pie chart has anything to show.
    pub has_quarterly_data: bool,

    /// Last records, newest first.
    pub recent: Vec<SaleRecord>,

    /// Date selected in the entry form.
    pub selected_date: NaiveDate,

    /// Record already stored for the selected date.
    pub selected_sale: Option<SaleRecord>,

    /// Number of stored entries excluded as malformed.
    pub quarantined: u32,
}

impl Dashboard {
    /// Recomputes every view from `snapshot`.
    pub fn compute(snapshot: &SalesSnapshot, year: i32, selected_date: NaiveDate) -> Self {
        let records = &snapshot.records;
        let monthly = monthly_summaries(records, year);
        let quarters = quarterly_totals(&monthly);

        Dashboard {
            year,
            totals: totals(records),
            weekly: weekly_buckets(records),
            has_quarterly_data: has_quarterly_data(&quarters),
            quarterly: quarterly_shares(&quarters),
            monthly,
            recent: recent_sales(records, RECENT_SALES_LIMIT),
            selected_date,
            selected_sale: find_by_date(records, selected_date).cloned(),
            quarantined: snapshot.quarantined.len() as u32,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
