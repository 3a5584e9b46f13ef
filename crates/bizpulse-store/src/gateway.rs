//! # Persistence Gateway
//!
//! Single entry point for reading and writing an account's business data.
//! The remote store is the shared source of truth; the SQLite cache keeps
//! the app usable offline.
//!
//! ## Load / Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Persistence Gateway Flow                           │
//! │                                                                         │
//! │  LOAD (never fails)                                                     │
//! │  ──────────────────                                                     │
//! │  remote GET ──ok, parses──▶ mirror into cache ──▶ return data          │
//! │      │                                                                  │
//! │      ├─ absent / error / timeout / bad JSON                            │
//! │      ▼                                                                  │
//! │  cache GET ──hit, parses──▶ return cached data                         │
//! │      │                                                                  │
//! │      └─ miss ──▶ return empty BusinessData                             │
//! │                                                                         │
//! │  SAVE                                                                   │
//! │  ────                                                                   │
//! │  1. serialize                          (error surfaces)                 │
//! │  2. cache PUT, awaited                 (error surfaces)                 │
//! │  3. remote PUT, spawned in background  (logged, never surfaces)        │
//! │                                                                         │
//! │  Concurrent writers: last writer wins, whole document.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::{debug, info, warn};

use bizpulse_core::BusinessData;

use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::StoreResult;
use crate::remote::DocumentStore;

/// Gateway over the remote document store and the local cache.
///
/// Cheap to clone; clones share the store, pool, and config.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn DocumentStore>,
    db: Database,
    config: Arc<StoreConfig>,
}

impl PersistenceGateway {
    /// Creates a gateway over the given store and cache database.
    pub fn new(store: Arc<dyn DocumentStore>, db: Database, config: Arc<StoreConfig>) -> Self {
        PersistenceGateway { store, db, config }
    }

    /// Loads business data for `username`.
    ///
    /// Infallible: remote problems fall back to the cached copy, and a
    /// cold cache yields empty data. `username` must be normalized.
    pub async fn load(&self, username: &str) -> BusinessData {
        let key = self.config.data_key(username);
        let deadline = self.config.remote_timeout();

        match tokio::time::timeout(deadline, self.store.get(&key)).await {
            Ok(Ok(Some(payload))) => match serde_json::from_str::<BusinessData>(&payload) {
                Ok(data) => {
                    // Mirror so the next offline session sees this copy
                    if let Err(e) = self.db.cache().put(&key, &payload).await {
                        warn!(key = %key, error = %e, "Failed to mirror remote document into cache");
                    }
                    debug!(key = %key, "Loaded business data from remote");
                    return data;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Remote document is malformed, trying cache");
                }
            },
            Ok(Ok(None)) => {
                debug!(key = %key, "No remote document, trying cache");
            }
            Ok(Err(e)) => {
                warn!(key = %key, error = %e, "Remote load failed, trying cache");
            }
            Err(_) => {
                warn!(
                    key = %key,
                    seconds = deadline.as_secs(),
                    "Remote load timed out, trying cache"
                );
            }
        }

        match self.load_cached(&key).await {
            Some(data) => data,
            None => {
                debug!(key = %key, "No usable cached copy, starting from empty data");
                BusinessData::default()
            }
        }
    }

    async fn load_cached(&self, key: &str) -> Option<BusinessData> {
        match self.db.cache().get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(data) => {
                    debug!(key = %key, "Loaded business data from cache");
                    Some(data)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Cached document is malformed, ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed");
                None
            }
        }
    }

    /// Saves business data for `username`.
    ///
    /// The cache write is awaited and authoritative; the remote write
    /// happens in the background with the configured deadline and its
    /// failures are only logged.
    pub async fn save(&self, username: &str, data: &BusinessData) -> StoreResult<()> {
        let key = self.config.data_key(username);
        let payload = serde_json::to_string(data)?;

        self.db.cache().put(&key, &payload).await?;
        debug!(key = %key, "Business data written to cache");

        self.spawn_remote_put(key, payload);
        Ok(())
    }

    fn spawn_remote_put(&self, key: String, payload: String) {
        let store = Arc::clone(&self.store);
        let deadline = self.config.remote_timeout();

        tokio::spawn(async move {
            match tokio::time::timeout(deadline, store.put(&key, &payload)).await {
                Ok(Ok(())) => debug!(key = %key, "Background remote write complete"),
                Ok(Err(e)) => warn!(key = %key, error = %e, "Background remote write failed"),
                Err(_) => warn!(
                    key = %key,
                    seconds = deadline.as_secs(),
                    "Background remote write timed out"
                ),
            }
        });
    }

    /// Drops all traces of `username`'s business data.
    ///
    /// The cache entry is removed; the remote document is overwritten
    /// with empty data on a best-effort basis.
    pub async fn purge(&self, username: &str) -> StoreResult<()> {
        let key = self.config.data_key(username);
        let deadline = self.config.remote_timeout();

        self.db.cache().remove(&key).await?;

        let payload = serde_json::to_string(&BusinessData::default())?;
        match tokio::time::timeout(deadline, self.store.put(&key, &payload)).await {
            Ok(Ok(())) => info!(key = %key, "Remote business data reset"),
            Ok(Err(e)) => warn!(key = %key, error = %e, "Failed to reset remote business data"),
            Err(_) => warn!(key = %key, "Timed out resetting remote business data"),
        }

        Ok(())
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConfig;
    use crate::remote::MemoryDocumentStore;
    use bizpulse_core::{Money, StockItem};
    use std::time::Duration;

    async fn gateway_with_store() -> (PersistenceGateway, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = Arc::new(StoreConfig::default());
        let gateway = PersistenceGateway::new(store.clone(), db, config);
        (gateway, store)
    }

    fn sample_data() -> BusinessData {
        let mut data = BusinessData::default();
        data.stock_items.push(StockItem::new(
            "Rice 5kg",
            20,
            Money::from_major(400),
            Money::from_major(450),
        ));
        data
    }

    /// Polls the memory store until the background write lands.
    async fn wait_for_remote(store: &MemoryDocumentStore, key: &str) -> Option<String> {
        for _ in 0..50 {
            if let Some(body) = store.contents(key) {
                return Some(body);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        None
    }

    #[tokio::test]
    async fn test_load_unknown_account_returns_empty() {
        let (gateway, _store) = gateway_with_store().await;

        let data = gateway.load("karim").await;
        assert!(data.sales.is_empty());
        assert!(data.config.is_none());
    }

    #[tokio::test]
    async fn test_load_prefers_remote_and_mirrors_to_cache() {
        let (gateway, store) = gateway_with_store().await;
        let payload = serde_json::to_string(&sample_data()).unwrap();
        store.insert("bizpulse_data_karim", &payload);

        let data = gateway.load("karim").await;
        assert_eq!(data.stock_items.len(), 1);

        // Remote copy got mirrored; a later offline load must still work
        store.set_failing(true);
        let offline = gateway.load("karim").await;
        assert_eq!(offline.stock_items.len(), 1);
        assert_eq!(offline.stock_items[0].name, "Rice 5kg");
    }

    #[tokio::test]
    async fn test_save_writes_cache_even_when_remote_is_down() {
        let (gateway, store) = gateway_with_store().await;
        store.set_failing(true);

        gateway.save("karim", &sample_data()).await.unwrap();

        let data = gateway.load("karim").await;
        assert_eq!(data.stock_items.len(), 1);
    }

    #[tokio::test]
    async fn test_save_reaches_remote_in_background() {
        let (gateway, store) = gateway_with_store().await;

        gateway.save("karim", &sample_data()).await.unwrap();

        let body = wait_for_remote(&store, "bizpulse_data_karim").await;
        let remote: BusinessData = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(remote.stock_items.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_remote_falls_back_to_cache() {
        let (gateway, store) = gateway_with_store().await;

        // Seed a good cached copy through the normal save path
        gateway.save("karim", &sample_data()).await.unwrap();
        // Then corrupt the remote copy
        store.insert("bizpulse_data_karim", "{not json");

        let data = gateway.load("karim").await;
        assert_eq!(data.stock_items.len(), 1);
    }

    #[tokio::test]
    async fn test_purge_clears_cache_and_resets_remote() {
        let (gateway, store) = gateway_with_store().await;

        gateway.save("karim", &sample_data()).await.unwrap();
        wait_for_remote(&store, "bizpulse_data_karim").await;

        gateway.purge("karim").await.unwrap();

        // Cache gone: with the remote down, the load starts from scratch
        store.set_failing(true);
        let data = gateway.load("karim").await;
        assert!(data.stock_items.is_empty());

        // Remote overwritten with empty data
        store.set_failing(false);
        let remote: BusinessData =
            serde_json::from_str(&store.contents("bizpulse_data_karim").unwrap()).unwrap();
        assert!(remote.stock_items.is_empty());
    }

    #[tokio::test]
    async fn test_purge_survives_remote_outage() {
        let (gateway, store) = gateway_with_store().await;
        gateway.save("karim", &sample_data()).await.unwrap();

        store.set_failing(true);
        gateway.purge("karim").await.unwrap();

        let data = gateway.load("karim").await;
        assert!(data.stock_items.is_empty());
    }
}
