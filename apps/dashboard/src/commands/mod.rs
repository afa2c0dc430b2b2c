//! # Commands Module
//!
//! Everything the console (or any other front end) can ask of the
//! dashboard.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── sale.rs       ◄─── Add, delete, look up, preview
//! ├── dashboard.rs  ◄─── Computed views over the snapshot
//! └── report.rs     ◄─── Annual PDF export
//! ```
//!
//! Every command takes the [`SalesState`](crate::state::SalesState) it
//! needs and returns `Result<T, ApiError>`; the error's `message` is what
//! gets shown inline.

pub mod dashboard;
pub mod report;
pub mod sale;
