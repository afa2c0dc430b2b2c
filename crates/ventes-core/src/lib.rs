//! # ventes-core: Pure Business Logic for Ventes
//!
//! This crate is the **heart** of the daily sales tracker. It contains the
//! record model, the 80/20 split rule and every aggregate view as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ventes Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (console / web)                    │   │
//! │  │    Entry form ──► Recent sales ──► Charts ──► PDF export        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ventes-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ aggregate │  │ validation│  │   │
//! │  │   │SaleRecord │  │  80 / 20  │  │  monthly  │  │   input   │  │   │
//! │  │   │ Snapshot  │  │   split   │  │  weekly   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ventes-db (Record Store)                     │   │
//! │  │         date-keyed JSON records, live snapshot subscription     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record model (`SaleRecord`, `RawSaleRecord`, `SalesSnapshot`) and view types
//! - [`money`] - Split derivation and two-decimal display
//! - [`calendar`] - Date key parsing, French month labels, week-of-month
//! - [`aggregate`] - Monthly, weekly, quarterly and grand-total views
//! - [`validation`] - Entry form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ventes_core::money::derive_split;
//!
//! let split = derive_split(100.0);
//! assert!((split.net_amount - 80.0).abs() < 1e-9);
//! assert!((split.honoraire_amount - 20.0).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod calendar;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::Dashboard;
pub use error::{CoreError, MalformedRecord, ValidationError};
pub use money::{derive_split, format_amount, Split};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Share of the gross amount kept after the fee.
pub const NET_RATE: f64 = 0.80;

/// Share of the gross amount deducted as fee (honoraire).
pub const HONORAIRE_RATE: f64 = 0.20;

/// Collection path under which every date-keyed record lives.
pub const DEFAULT_COLLECTION: &str = "ventes/";

/// Maximum number of weekly buckets handed to the chart.
///
/// ## Business Reason
/// Chart readability. Buckets past the twelfth are dropped, not merged.
pub const WEEKLY_BUCKET_LIMIT: usize = 12;

/// Number of entries in the "recent sales" list.
pub const RECENT_SALES_LIMIT: usize = 10;
