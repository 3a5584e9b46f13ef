//! # Document Cache Repository
//!
//! Local mirror of remote documents, keyed by the same string keys used
//! against the remote store.
//!
//! ## Read/Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                                                                 │
//! │  LOAD (gateway)                                                 │
//! │    remote GET ──ok──▶ cache.put(key, payload)  (mirror)        │
//! │        │                                                        │
//! │        └──fail──▶ cache.get(key)  (offline fallback)           │
//! │                                                                 │
//! │  SAVE (gateway)                                                 │
//! │    cache.put(key, payload)   ← synchronous, authoritative      │
//! │    remote PUT                ← background, best-effort         │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payloads are opaque strings here; serialization lives with the caller.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;

/// Repository for cached document payloads.
#[derive(Debug, Clone)]
pub struct CacheRepository {
    pool: SqlitePool,
}

impl CacheRepository {
    /// Creates a new CacheRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CacheRepository { pool }
    }

    /// Fetches a cached payload by key.
    ///
    /// Returns `Ok(None)` when the key has never been cached.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cache_entries WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payload)
    }

    /// Stores a payload under the given key, replacing any previous value.
    pub async fn put(&self, key: &str, payload: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();

        debug!(key = %key, bytes = payload.len(), "Caching document");

        sqlx::query(
            r#"
            INSERT INTO cache_entries (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a cached entry.
    ///
    /// ## Returns
    /// `true` if an entry was deleted, `false` if the key was absent.
    pub async fn remove(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts cached entries.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cache_entries")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let db = test_db().await;
        let cache = db.cache();

        assert_eq!(cache.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let db = test_db().await;
        let cache = db.cache();

        cache.put("bizpulse_data_karim", r#"{"sales":[]}"#).await.unwrap();

        let payload = cache.get("bizpulse_data_karim").await.unwrap();
        assert_eq!(payload.as_deref(), Some(r#"{"sales":[]}"#));
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let db = test_db().await;
        let cache = db.cache();

        cache.put("k", "v1").await.unwrap();
        cache.put("k", "v2").await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(cache.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = test_db().await;
        let cache = db.cache();

        cache.put("k", "v").await.unwrap();

        assert!(cache.remove("k").await.unwrap());
        assert!(!cache.remove("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }
}
