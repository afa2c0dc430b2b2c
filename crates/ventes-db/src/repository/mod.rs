//! # Repository Module
//!
//! SQL access for the record store.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqliteRecordStore (store.rs)                                          │
//! │       │                                                                 │
//! │       │  db.records().upsert("ventes/", "2025-01-05", &value)          │
//! │       ▼                                                                 │
//! │  RecordRepository                                                      │
//! │  ├── list(&self, collection)                                           │
//! │  ├── get(&self, collection, key)                                       │
//! │  ├── upsert(&self, collection, key, value)                             │
//! │  └── delete(&self, collection, key)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  records table                                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository knows nothing about sales: values are plain JSON, and
//! normalization happens one layer up.

pub mod record;
