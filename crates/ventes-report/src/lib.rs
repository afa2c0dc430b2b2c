//! # ventes-report: Annual Report Export
//!
//! Produces the annual sales report: a summary section, a 12-row monthly
//! table and a per-day detail table, paginated on A4.
//!
//! ## Module Organization
//!
//! - [`layout`] - Pure page layout (millimetres, fonts, pagination)
//! - [`pdf`] - `lopdf` rendering of a laid-out document
//! - [`export`] - Snapshot in, file on disk out
//! - [`error`] - Report error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ventes_report::{export_report, ReportOptions};
//!
//! let path = export_report(&snapshot, 2025, today, &ReportOptions::default())?;
//! println!("saved {}", path.display());
//! ```

pub mod error;
pub mod export;
pub mod layout;
pub mod pdf;

pub use error::{ReportError, ReportResult};
pub use export::{export_report, layout_report, ReportOptions};
pub use layout::{build_report, report_file_name, ReportDocument};
pub use pdf::render_pdf;
