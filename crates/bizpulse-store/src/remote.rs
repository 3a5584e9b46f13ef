//! # Remote Document Store Client
//!
//! HTTP client for the shared key-value document service. Every account's
//! business data lives under one key, the account registry under another;
//! the server knows nothing about the payloads beyond storing strings.
//!
//! ## Wire Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                                                                 │
//! │  GET  {base_url}/{key}                                         │
//! │    200 → body is the stored document                           │
//! │    404 → document has never been written   (Ok(None))          │
//! │    ... → Unreachable                                           │
//! │                                                                 │
//! │  POST {base_url}/{key}                                         │
//! │    body: the document, content-type application/json           │
//! │    2xx → stored                                                │
//! │    ... → Unreachable                                           │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The trait seam exists so the gateway and directory can be exercised
//! against an in-memory store in tests.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Trait
// =============================================================================

/// A remote store of string documents addressed by key.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches the document stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `body` under `key`, replacing any previous document.
    async fn put(&self, key: &str, body: &str) -> StoreResult<()>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`DocumentStore`] backed by the HTTP key-value service.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    /// Creates a client for the service at `base_url`.
    ///
    /// The timeout applies per request. Trailing slashes on the base URL
    /// are tolerated.
    pub fn new(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        // Fail fast on malformed URLs instead of per-request
        Url::parse(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::unreachable(format!("HTTP client init failed: {}", e)))?;

        Ok(HttpDocumentStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn document_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let url = self.document_url(key);
        debug!(key = %key, "GET remote document");

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                Ok(Some(body))
            }
            status => Err(StoreError::unreachable(format!(
                "GET {} returned {}",
                key, status
            ))),
        }
    }

    async fn put(&self, key: &str, body: &str) -> StoreResult<()> {
        let url = self.document_url(key);
        debug!(key = %key, bytes = body.len(), "POST remote document");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::unreachable(format!(
                "POST {} returned {}",
                key, status
            )));
        }

        Ok(())
    }
}

// =============================================================================
// In-Memory Implementation (tests)
// =============================================================================

/// [`DocumentStore`] held entirely in memory, with a switchable failure
/// mode for exercising offline paths.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryDocumentStore {
    docs: std::sync::Mutex<std::collections::HashMap<String, String>>,
    fail: std::sync::atomic::AtomicBool,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MemoryDocumentStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// When set, every call returns `Unreachable`.
    pub(crate) fn set_failing(&self, failing: bool) {
        self.fail
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    /// When set, only writes return `Unreachable`; reads keep working.
    pub(crate) fn set_failing_writes(&self, failing: bool) {
        self.fail_writes
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub(crate) fn contents(&self, key: &str) -> Option<String> {
        self.docs.lock().unwrap().get(key).cloned()
    }

    pub(crate) fn insert(&self, key: &str, body: &str) {
        self.docs
            .lock()
            .unwrap()
            .insert(key.to_string(), body.to_string());
    }

    fn check_failing(&self) -> StoreResult<()> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            Err(StoreError::unreachable("simulated outage"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_failing()?;
        Ok(self.docs.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, body: &str) -> StoreResult<()> {
        self.check_failing()?;
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::unreachable("simulated write outage"));
        }
        self.insert(key, body);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_base_url() {
        let result = HttpDocumentStore::new("not a url", Duration::from_secs(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_document_url_joins_key() {
        let store = HttpDocumentStore::new("http://localhost:8765/kv/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            store.document_url("bizpulse_users_registry"),
            "http://localhost:8765/kv/bizpulse_users_registry"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_store_error() {
        // Port 1 on loopback is never listening; connection is refused fast.
        let store =
            HttpDocumentStore::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

        let err = store.get("anything").await.unwrap_err();
        assert!(err.is_unreachable(), "got: {err}");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryDocumentStore::new();

        assert_eq!(store.get("k").await.unwrap(), None);
        store.put("k", "doc").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("doc"));
    }

    #[tokio::test]
    async fn test_memory_store_failure_mode() {
        let store = MemoryDocumentStore::new();
        store.put("k", "doc").await.unwrap();

        store.set_failing(true);
        assert!(store.get("k").await.unwrap_err().is_unreachable());

        store.set_failing(false);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("doc"));
    }
}
