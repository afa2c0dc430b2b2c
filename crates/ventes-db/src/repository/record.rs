//! # Record Repository
//!
//! Keyed JSON values grouped by collection.
//!
//! ## Table Layout
//! ```text
//! records
//! ┌────────────┬────────────┬──────────────────────────────┬──────────────┐
//! │ collection │ key        │ value (JSON text)            │ updated_at   │
//! ├────────────┼────────────┼──────────────────────────────┼──────────────┤
//! │ ventes/    │ 2025-01-05 │ {"amount":50,"netAmount":40} │ 2025-01-05T… │
//! │ ventes/    │ 2025-01-20 │ {"amount":150}               │ 2025-01-20T… │
//! └────────────┴────────────┴──────────────────────────────┴──────────────┘
//! PRIMARY KEY (collection, key)
//! ```
//!
//! Rows come back in ascending key order, which for date keys is
//! chronological order.

use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Repository for raw record rows.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.records();
///
/// repo.upsert("ventes/", "2025-01-05", &json!({ "amount": 50 })).await?;
/// let rows = repo.list("ventes/").await?;
/// ```
#[derive(Debug, Clone)]
pub struct RecordRepository {
    pool: SqlitePool,
}

impl RecordRepository {
    /// Creates a new RecordRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecordRepository { pool }
    }

    /// Lists every entry of a collection, ordered by key.
    ///
    /// A value that is not valid JSON comes back as `Value::Null`, so the
    /// entry still shows up (and gets quarantined) instead of failing the
    /// whole listing.
    pub async fn list(&self, collection: &str) -> DbResult<Vec<(String, Value)>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT key, value
            FROM records
            WHERE collection = ?1
            ORDER BY key ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        debug!(collection = %collection, count = rows.len(), "Listed records");

        Ok(rows
            .into_iter()
            .map(|(key, text)| {
                let value = parse_value(&key, &text);
                (key, value)
            })
            .collect())
    }

    /// Gets one entry by key.
    pub async fn get(&self, collection: &str, key: &str) -> DbResult<Option<Value>> {
        let text: Option<String> = sqlx::query_scalar(
            r#"
            SELECT value
            FROM records
            WHERE collection = ?1 AND key = ?2
            "#,
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(text.map(|text| parse_value(key, &text)))
    }

    /// Creates or fully replaces the entry at `key`.
    pub async fn upsert(&self, collection: &str, key: &str, value: &Value) -> DbResult<()> {
        let text = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO records (collection, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (collection, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(&text)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(collection = %collection, key = %key, "Upserted record");
        Ok(())
    }

    /// Removes the entry at `key`.
    ///
    /// Returns whether a row existed.
    pub async fn delete(&self, collection: &str, key: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM records
            WHERE collection = ?1 AND key = ?2
            "#,
        )
        .bind(collection)
        .bind(key)
        .execute(&self.pool)
        .await?;

        let existed = result.rows_affected() > 0;
        debug!(collection = %collection, key = %key, existed, "Deleted record");
        Ok(existed)
    }

    /// Counts the entries of a collection.
    pub async fn count(&self, collection: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE collection = ?1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn parse_value(key: &str, text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(key = %key, error = %e, "Stored value is not valid JSON");
        Value::Null
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::pool::{Database, DbConfig};

    const COLLECTION: &str = "ventes/";

    async fn repo() -> (Database, super::RecordRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.records();
        (db, repo)
    }

    #[tokio::test]
    async fn test_upsert_then_get() {
        let (_db, repo) = repo().await;
        repo.upsert(COLLECTION, "2025-01-05", &json!({ "amount": 50 }))
            .await
            .unwrap();

        let value = repo.get(COLLECTION, "2025-01-05").await.unwrap();
        assert_eq!(value, Some(json!({ "amount": 50 })));
        assert_eq!(repo.get(COLLECTION, "2025-01-06").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_value() {
        let (_db, repo) = repo().await;
        repo.upsert(COLLECTION, "2025-03-15", &json!({ "amount": 100, "netAmount": 90 }))
            .await
            .unwrap();
        repo.upsert(COLLECTION, "2025-03-15", &json!({ "amount": 250 }))
            .await
            .unwrap();

        assert_eq!(repo.count(COLLECTION).await.unwrap(), 1);
        let value = repo.get(COLLECTION, "2025-03-15").await.unwrap().unwrap();
        assert_eq!(value, json!({ "amount": 250 }));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_key_and_scoped_by_collection() {
        let (_db, repo) = repo().await;
        repo.upsert(COLLECTION, "2025-01-20", &json!({ "amount": 150 }))
            .await
            .unwrap();
        repo.upsert(COLLECTION, "2025-01-05", &json!({ "amount": 50 }))
            .await
            .unwrap();
        repo.upsert("autres/", "2025-01-01", &json!({ "amount": 1 }))
            .await
            .unwrap();

        let rows = repo.list(COLLECTION).await.unwrap();
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2025-01-05", "2025-01-20"]);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let (_db, repo) = repo().await;
        repo.upsert(COLLECTION, "2025-01-05", &json!({ "amount": 50 }))
            .await
            .unwrap();

        assert!(repo.delete(COLLECTION, "2025-01-05").await.unwrap());
        assert!(!repo.delete(COLLECTION, "2025-01-05").await.unwrap());
        assert_eq!(repo.count(COLLECTION).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_json_reads_as_null() {
        let (_db, repo) = repo().await;
        sqlx::query(
            "INSERT INTO records (collection, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(COLLECTION)
        .bind("2025-02-01")
        .bind("{not json")
        .bind("2025-02-01T00:00:00Z")
        .execute(&repo.pool)
        .await
        .unwrap();

        let rows = repo.list(COLLECTION).await.unwrap();
        assert_eq!(rows, vec![("2025-02-01".to_string(), serde_json::Value::Null)]);
    }
}
