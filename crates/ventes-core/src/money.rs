//! # Money Module
//!
//! The 80/20 split rule and the two-decimal display of amounts.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Entry "123.456"                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  derive_split(123.456) ──► net 98.7648 / honoraire 24.6912              │
//! │       │                    (stored as-is, NEVER rounded)               │
//! │       ▼                                                                 │
//! │  format_amount(98.7648) ──► "98.76 $"                                   │
//! │                             (display only)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ventes_core::money::{derive_split, format_amount};
//!
//! let split = derive_split(100.0);
//! assert_eq!(format_amount(split.net_amount), "80.00 $");
//! assert_eq!(format_amount(split.honoraire_amount), "20.00 $");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{HONORAIRE_RATE, NET_RATE};

/// Currency symbol appended to displayed amounts.
pub const CURRENCY_SYMBOL: &str = "$";

// =============================================================================
// Split
// =============================================================================

/// Net / fee allocation of a gross amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Split {
    /// 80% of gross.
    pub net_amount: f64,

    /// 20% of gross.
    pub honoraire_amount: f64,
}

/// Derives the net and fee portions of a gross amount.
///
/// Any finite number is accepted here, negative included; rejecting
/// negative entries is the job of [`crate::validation`].
///
/// ## Example
/// ```rust
/// use ventes_core::money::derive_split;
///
/// let split = derive_split(250.0);
/// assert!((split.net_amount + split.honoraire_amount - 250.0).abs() < 1e-9);
/// ```
#[inline]
pub fn derive_split(amount: f64) -> Split {
    Split {
        net_amount: amount * NET_RATE,
        honoraire_amount: amount * HONORAIRE_RATE,
    }
}

// =============================================================================
// Preview
// =============================================================================

/// Live preview of the split for whatever is typed in the amount field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SplitPreview {
    /// Gross amount as understood from the input.
    pub amount: f64,

    /// Net portion.
    pub net_amount: f64,

    /// Fee portion.
    pub honoraire_amount: f64,
}

/// Previews the split for raw form input.
///
/// Reads the longest numeric prefix of the input, so `"12abc"` previews as
/// 12 while the amount is still being typed. Input with no numeric prefix
/// previews as zero; the preview never fails. Submitting still goes through
/// strict validation.
pub fn preview_split(input: &str) -> SplitPreview {
    let amount = leading_number(input)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    let split = derive_split(amount);

    SplitPreview {
        amount,
        net_amount: split.net_amount,
        honoraire_amount: split.honoraire_amount,
    }
}

/// Parses the longest `[+-]digits[.digits][e[+-]digits]` prefix of `input`
/// after leading whitespace.
fn leading_number(input: &str) -> Option<f64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

// =============================================================================
// Display
// =============================================================================

/// Formats an amount with two decimals and the currency symbol.
///
/// ## Example
/// ```rust
/// use ventes_core::money::format_amount;
///
/// assert_eq!(format_amount(1234.5), "1234.50 $");
/// assert_eq!(format_amount(0.0), "0.00 $");
/// ```
pub fn format_amount(value: f64) -> String {
    format!("{:.2} {}", value, CURRENCY_SYMBOL)
}

// =============================================================================
// Unit Tests
// =============================================================================
