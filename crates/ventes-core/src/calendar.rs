//! # Calendar Rules
//!
//! Date keys, month labels and week-of-month bucketing.
//!
//! Keys are plain `YYYY-MM-DD` calendar dates. They are parsed as
//! [`NaiveDate`], so no time zone ever enters month or quarter bucketing.
//!
//! ## Week of Month
//! ```text
//! day  1..=7   → S1
//! day  8..=14  → S2
//! day 15..=21  → S3
//! day 22..=28  → S4
//! day 29..=31  → S5
//! ```
//! Weeks are relative to the calendar month, not ISO weeks.

use chrono::{Datelike, NaiveDate};

/// Format of every record key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Full month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Short month labels used in weekly bucket keys.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Quarter labels, Q1 first.
pub const QUARTER_LABELS: [&str; 4] = ["T1", "T2", "T3", "T4"];

/// Parses a record key.
///
/// Only the canonical zero-padded form is accepted: `"2025-3-5"` is
/// rejected even though chrono would read it, because lookups compare keys
/// verbatim.
///
/// ## Example
/// ```rust
/// use ventes_core::calendar::parse_date_key;
///
/// assert!(parse_date_key("2025-03-15").is_some());
/// assert!(parse_date_key("2025-3-15").is_none());
/// assert!(parse_date_key("2025-02-30").is_none());
/// ```
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()?;
    (date_key(date) == key).then_some(date)
}

/// Formats a date as a record key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// `ceil(day / 7)`, in `1..=5`.
#[inline]
pub fn week_of_month(date: NaiveDate) -> u32 {
    date.day().div_ceil(7)
}

/// Weekly chart bucket key, e.g. `"janv. S2"`.
pub fn weekly_key(date: NaiveDate) -> String {
    format!(
        "{} S{}",
        MONTH_ABBREVIATIONS[date.month0() as usize],
        week_of_month(date)
    )
}

/// Day-first display form, e.g. `"15/03/2025"`.
pub fn format_date_fr(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
