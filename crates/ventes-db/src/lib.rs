//! # ventes-db: Record Store for Ventes
//!
//! Persists date-keyed sale records in SQLite (sqlx, async) and pushes the
//! whole collection to subscribers after every change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ventes Data Flow                                 │
//! │                                                                         │
//! │  Dashboard command (add_daily_sale)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ventes-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  RecordRepo   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ (record.rs)   │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼────────┐                      │   │
//! │  │                        │ SqliteRecord   │ ──► Subscription     │   │
//! │  │                        │ Store          │     (watch channel)  │   │
//! │  │                        └────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (<data dir>/ventes.db)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the database file or an in-memory database
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Raw keyed JSON rows
//! - [`store`] - The [`RecordStore`] trait and its SQLite implementation
//! - [`import`] - Loading a hosted-store export into a collection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ventes_db::{Database, DbConfig, RecordStore, SqliteRecordStore};
//!
//! let db = Database::new(DbConfig::new("ventes.db")).await?;
//! let store = SqliteRecordStore::new(db);
//!
//! let mut sub = store.subscribe("ventes/").await?;
//! let snapshot = sub.next().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use import::{import_entries, ImportSummary};
pub use pool::{Database, DbConfig, DbLocation};
pub use repository::record::RecordRepository;
pub use store::{RecordStore, SqliteRecordStore, Subscription};
