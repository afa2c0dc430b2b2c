//! # Domain Types
//!
//! Record model and the view types produced by [`crate::aggregate`].
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Store side                        Core side                            │
//! │  ──────────                        ─────────                            │
//! │  ┌─────────────────┐  normalize   ┌─────────────────┐                   │
//! │  │ RawSaleRecord   │ ───────────► │   SaleRecord    │                   │
//! │  │ amount?         │              │ date (key)      │                   │
//! │  │ netAmount       │  (or         │ amount          │                   │
//! │  │   Present|Absent│  quarantine) │ net_amount      │                   │
//! │  │ honoraireAmount │              │ honoraire_amount│                   │
//! │  │   Present|Absent│              └────────┬────────┘                   │
//! │  └─────────────────┘                       │                            │
//! │                                            ▼                            │
//! │            MonthlySummary • WeeklyBucket • QuarterlyTotal • Totals      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single-Key Identity
//! A record is identified by its calendar date alone. Writing the same date
//! twice replaces the record; there is no surrogate id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use ts_rs::TS;

use crate::calendar::{date_key, parse_date_key};
use crate::error::MalformedRecord;
use crate::money::derive_split;

// =============================================================================
// Stored Field
// =============================================================================

/// An optional numeric field of a stored record.
///
/// ## Absent Values
/// `null`, a missing key, a non-number, `0` and non-finite values are all
/// `Absent`. Each field falls back independently.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StoredField {
    /// The store holds a usable value; it is kept as-is, even if it breaks
    /// the 80/20 split.
    Present(f64),

    /// Nothing usable is stored; the value is derived from `amount`.
    #[default]
    Absent,
}

impl StoredField {
    /// Reads a field from a stored JSON object.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_f64) {
            Some(v) if v.is_finite() && v != 0.0 => StoredField::Present(v),
            _ => StoredField::Absent,
        }
    }

    /// Returns the stored value, or `derived` when absent.
    #[inline]
    pub fn or_derive(self, derived: f64) -> f64 {
        match self {
            StoredField::Present(v) => v,
            StoredField::Absent => derived,
        }
    }

    /// Returns the stored value, if any.
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            StoredField::Present(v) => Some(v),
            StoredField::Absent => None,
        }
    }
}

// =============================================================================
// Raw Sale Record
// =============================================================================

/// A record value exactly as persisted in the store.
///
/// ## Wire Format
/// ```json
/// { "amount": 100, "netAmount": 80, "honoraireAmount": 20 }
/// ```
/// `netAmount` and `honoraireAmount` may be missing on legacy entries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawSaleRecord {
    /// Gross amount; `None` when missing or not a finite number.
    pub amount: Option<f64>,

    /// Stored net portion.
    pub net_amount: StoredField,

    /// Stored fee portion.
    pub honoraire_amount: StoredField,
}

impl RawSaleRecord {
    /// Builds the value written for a new entry: both portions derived and
    /// stored explicitly.
    pub fn derived(amount: f64) -> Self {
        let split = derive_split(amount);
        RawSaleRecord {
            amount: Some(amount),
            net_amount: StoredField::Present(split.net_amount),
            honoraire_amount: StoredField::Present(split.honoraire_amount),
        }
    }

    /// Reads a stored JSON value. Never fails: anything unusable ends up as
    /// a missing field and is caught by [`normalize_record`].
    pub fn from_json(value: &Value) -> Self {
        RawSaleRecord {
            amount: value
                .get("amount")
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite()),
            net_amount: StoredField::from_json(value.get("netAmount")),
            honoraire_amount: StoredField::from_json(value.get("honoraireAmount")),
        }
    }

    /// Serializes to the stored JSON form. Absent fields are omitted, never
    /// backfilled.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(amount) = self.amount {
            map.insert("amount".to_string(), json!(amount));
        }
        if let Some(net) = self.net_amount.value() {
            map.insert("netAmount".to_string(), json!(net));
        }
        if let Some(fee) = self.honoraire_amount.value() {
            map.insert("honoraireAmount".to_string(), json!(fee));
        }
        Value::Object(map)
    }
}

impl From<&SaleRecord> for RawSaleRecord {
    fn from(record: &SaleRecord) -> Self {
        RawSaleRecord {
            amount: Some(record.amount),
            net_amount: StoredField::from_json(Some(&json!(record.net_amount))),
            honoraire_amount: StoredField::from_json(Some(&json!(record.honoraire_amount))),
        }
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One day of sales, normalized and ready for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    /// Calendar date; the unique key.
    pub date: NaiveDate,

    /// Gross sale value.
    pub amount: f64,

    /// Net portion (80% unless a legacy value was stored).
    pub net_amount: f64,

    /// Fee portion (20% unless a legacy value was stored).
    pub honoraire_amount: f64,
}

impl SaleRecord {
    /// Creates a record with both portions derived from `amount`.
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        let split = derive_split(amount);
        SaleRecord {
            date,
            amount,
            net_amount: split.net_amount,
            honoraire_amount: split.honoraire_amount,
        }
    }

    /// Returns the store key (`YYYY-MM-DD`).
    pub fn key(&self) -> String {
        date_key(self.date)
    }
}

/// Normalizes a stored entry into a [`SaleRecord`].
///
/// ## Rules
/// - `netAmount` falls back to `amount * 0.8` when absent
/// - `honoraireAmount` falls back to `amount * 0.2` when absent
/// - Each field falls back independently; present values are never
///   re-derived, even when they break the 80/20 split
/// - A missing / non-finite `amount` or a non-canonical key is rejected
///
/// ## Example
/// ```rust
/// use ventes_core::types::{normalize_record, RawSaleRecord, StoredField};
///
/// let legacy = RawSaleRecord {
///     amount: Some(100.0),
///     net_amount: StoredField::Present(90.0),
///     honoraire_amount: StoredField::Absent,
/// };
/// let record = normalize_record("2025-01-10", &legacy).unwrap();
/// assert_eq!(record.net_amount, 90.0);
/// assert!((record.honoraire_amount - 20.0).abs() < 1e-9);
/// ```
pub fn normalize_record(key: &str, raw: &RawSaleRecord) -> Result<SaleRecord, MalformedRecord> {
    let date = parse_date_key(key)
        .ok_or_else(|| MalformedRecord::new(key, "key is not a YYYY-MM-DD date"))?;

    let amount = raw
        .amount
        .filter(|v| v.is_finite())
        .ok_or_else(|| MalformedRecord::new(key, "missing or non-numeric amount"))?;

    let split = derive_split(amount);

    Ok(SaleRecord {
        date,
        amount,
        net_amount: raw.net_amount.or_derive(split.net_amount),
        honoraire_amount: raw.honoraire_amount.or_derive(split.honoraire_amount),
    })
}

// =============================================================================
// Sales Snapshot
// =============================================================================

/// The full collection as last delivered by the store.
///
/// Replaced wholesale on every delivery; never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSnapshot {
    /// Normalized records, in store order.
    pub records: Vec<SaleRecord>,

    /// Entries that could not be normalized.
    pub quarantined: Vec<MalformedRecord>,
}

impl SalesSnapshot {
    /// Normalizes every stored entry, keeping store order.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, RawSaleRecord)>,
        K: AsRef<str>,
    {
        let mut snapshot = SalesSnapshot::default();
        for (key, raw) in entries {
            match normalize_record(key.as_ref(), &raw) {
                Ok(record) => snapshot.records.push(record),
                Err(malformed) => snapshot.quarantined.push(malformed),
            }
        }
        snapshot
    }

    /// Number of usable records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no usable record exists.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Totals for one calendar month of the tracked year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlySummary {
    /// Month name (`"Janvier"` ...).
    pub month: String,

    /// Sum of gross amounts.
    pub total: f64,

    /// Sum of net amounts.
    pub net_total: f64,

    /// Sum of fees.
    pub honoraire_total: f64,

    /// Number of records in the month.
    pub days: u32,
}

/// Gross / net sums for one `"<month> S<week>"` chart bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WeeklyBucket {
    /// Bucket key, e.g. `"janv. S2"`.
    pub week: String,

    /// Sum of gross amounts.
    pub gross: f64,

    /// Sum of net amounts.
    pub net: f64,
}

/// Net total for one quarter (`T1`..`T4`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuarterlyTotal {
    /// Quarter label.
    pub name: String,

    /// Sum of monthly net totals.
    pub value: f64,
}

/// A quarter with its share of the yearly net total (pie chart slice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuarterShare {
    /// Quarter label.
    pub name: String,

    /// Net total of the quarter.
    pub value: f64,

    /// Share in percent, 0 when the year has no net total.
    pub percent: f64,
}

/// Grand totals over the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    /// Sum of gross amounts.
    pub total: f64,

    /// Sum of net amounts.
    pub net_total: f64,

    /// Sum of fees.
    pub honoraire_total: f64,

    /// Number of records.
    pub days_with_sales: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================
