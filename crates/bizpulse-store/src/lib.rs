//! # bizpulse-store: Persistence Layer for BizPulse
//!
//! This crate connects the pure domain model in `bizpulse-core` to the
//! outside world: a shared remote document store, a local SQLite cache,
//! and the account registry that lives in the remote store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizPulse Data Flow                               │
//! │                                                                         │
//! │  CLI command (sale add, dashboard, …)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bizpulse-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │ AccountDirectory│  │ Persistence    │   │   Database    │  │   │
//! │  │   │ (directory.rs) │   │ Gateway        │   │   (db.rs)     │  │   │
//! │  │   │                │   │ (gateway.rs)   │   │               │  │   │
//! │  │   │ register       │──▶│ load / save /  │──▶│ SqlitePool    │  │   │
//! │  │   │ authenticate   │   │ purge          │   │ cache_entries │  │   │
//! │  │   │ delete / list  │   │                │   │ active_session│  │   │
//! │  │   └────────┬───────┘   └───────┬────────┘   └───────────────┘  │   │
//! │  │            │                   │                                │   │
//! │  │            └───────┬───────────┘                                │   │
//! │  │                    ▼                                            │   │
//! │  │          ┌──────────────────┐                                   │   │
//! │  │          │  DocumentStore   │  (remote.rs, trait + HTTP impl)   │   │
//! │  │          └──────────────────┘                                   │   │
//! │  └────────────────────┼────────────────────────────────────────────┘   │
//! │                       ▼                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Remote key-value document service                  │   │
//! │  │   {ns}_users_registry   {ns}_data_karim   {ns}_data_mita01     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`remote`] - Document store trait and HTTP client
//! - [`db`] - SQLite pool creation and configuration
//! - [`cache`] - Local mirror of remote documents
//! - [`session`] - Persisted sign-in state
//! - [`gateway`] - Load/save semantics over remote + cache
//! - [`directory`] - Account registration and login
//! - [`config`] - Store configuration (TOML + env)
//! - [`error`] - Persistence error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bizpulse_store::{
//!     AccountDirectory, Database, DbConfig, HttpDocumentStore, PersistenceGateway, StoreConfig,
//! };
//! use std::sync::Arc;
//!
//! let config = Arc::new(StoreConfig::load_or_default(None));
//! let store = Arc::new(HttpDocumentStore::new(
//!     &config.remote.base_url,
//!     config.remote_timeout(),
//! )?);
//! let db = Database::new(DbConfig::new(config.cache.database_path())).await?;
//!
//! let gateway = PersistenceGateway::new(store.clone(), db.clone(), config.clone());
//! let directory = AccountDirectory::new(store, gateway.clone(), config);
//!
//! let account = directory.authenticate("karim", "pass123").await?;
//! let data = gateway.load(&account.username).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod remote;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use db::{Database, DbConfig};
pub use directory::{AccountDirectory, BOOTSTRAP_ADMIN_USERNAME};
pub use error::{StoreError, StoreResult};
pub use gateway::PersistenceGateway;
pub use remote::{DocumentStore, HttpDocumentStore};

// Repository re-exports for convenience
pub use cache::CacheRepository;
pub use session::SessionStore;
