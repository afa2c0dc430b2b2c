//! # State Module
//!
//! Application state for the dashboard.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      SalesState                                 │   │
//! │  │                                                                 │   │
//! │  │  • store          Arc<dyn RecordStore>                          │   │
//! │  │  • snapshot       RwLock<SalesSnapshot>, replaced by listener   │   │
//! │  │  • selected date  Mutex<NaiveDate>                              │   │
//! │  │  • amount text    Mutex<String>                                 │   │
//! │  │  • in-flight      AtomicBool + WriteGuard                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Snapshot: written only by the listener task                         │
//! │  • Form fields: short std locks, never held across an await            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod sales;

pub use sales::{SalesState, WriteGuard};
