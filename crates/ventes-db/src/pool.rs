//! # Database Handle
//!
//! Opens the SQLite file (or an in-memory database) that backs the record
//! store, and applies the embedded migrations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DbConfig::new(path)        DbConfig::in_memory()                       │
//! │        │                           │                                    │
//! │        ▼                           ▼                                    │
//! │  File: WAL, NORMAL sync      Memory: one connection, never reaped       │
//! │        └─────────────┬─────────────┘                                    │
//! │                      ▼                                                  │
//! │            Database::new ── migrate! ──► records()                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::record::RecordRepository;

/// Where the records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A database file, created on first open.
    File(PathBuf),
    /// A private database that disappears with its connection.
    Memory,
}

/// How to open the record database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Pool size for file databases. Memory databases always use one
    /// connection, since each connection would see its own empty database.
    pub max_connections: u32,
}

impl DbConfig {
    /// A file database at `path` with the default pool size of 5.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 5,
        }
    }

    /// An isolated in-memory database, used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
        }
    }

    /// Sets the pool size. Ignored for memory databases.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Handle on the record database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let pool = match &config.location {
            DbLocation::File(path) => {
                info!(
                    path = %path.display(),
                    max_connections = config.max_connections,
                    "Opening record database"
                );
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal);
                SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_with(options)
                    .await
            }
            DbLocation::Memory => {
                let options = SqliteConnectOptions::from_str("sqlite::memory:")
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
            }
        }
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::run_migrations(&pool).await?;
        Ok(Database { pool })
    }

    /// Returns the record repository.
    pub fn records(&self) -> RecordRepository {
        RecordRepository::new(self.pool.clone())
    }

    /// Closes the pool. Later operations fail with
    /// [`DbError::ConnectionFailed`].
    pub async fn close(&self) {
        info!("Closing record database");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ventes.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.records()
            .upsert("ventes/", "2025-01-05", &json!({ "amount": 50 }))
            .await
            .unwrap();
        db.close().await;
        assert!(path.exists());

        let reopened = Database::new(DbConfig::new(&path).max_connections(2))
            .await
            .unwrap();
        assert_eq!(reopened.records().count("ventes/").await.unwrap(), 1);
        reopened.close().await;
    }

    #[tokio::test]
    async fn test_memory_databases_are_isolated() {
        let first = Database::new(DbConfig::in_memory()).await.unwrap();
        let second = Database::new(DbConfig::in_memory()).await.unwrap();

        first
            .records()
            .upsert("ventes/", "2025-01-05", &json!({ "amount": 50 }))
            .await
            .unwrap();
        assert_eq!(second.records().count("ventes/").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_database_rejects_reads() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = db.records().count("ventes/").await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_config_locations() {
        let config = DbConfig::new("/tmp/ventes.db").max_connections(10);
        assert_eq!(config.location, DbLocation::File(PathBuf::from("/tmp/ventes.db")));
        assert_eq!(config.max_connections, 10);
        assert_eq!(DbConfig::in_memory().location, DbLocation::Memory);
    }
}
