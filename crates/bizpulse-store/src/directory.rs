//! # Account Directory
//!
//! Registration, login, and removal of accounts against a shared registry
//! document in the remote store.
//!
//! ## Registry Document
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              {namespace}_users_registry  (one JSON array)               │
//! │                                                                         │
//! │  [                                                                      │
//! │    { "username": "karim",  "password": "…", "last_login": "…" },       │
//! │    { "username": "mita01", "password": "…", "last_login": "…" }        │
//! │  ]                                                                      │
//! │                                                                         │
//! │  READS  fail open: unreachable / absent / malformed ⇒ empty list       │
//! │  WRITES rewrite the whole document (last writer wins)                  │
//! │                                                                         │
//! │  The bootstrap admin is NOT in this document. Its credential is        │
//! │  checked before the registry is consulted, so admin login works        │
//! │  even while the remote store is down.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usernames are normalized (trimmed, lower-cased) before any comparison
//! or key derivation, so `"  Karim "` and `"karim"` are one account.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use bizpulse_core::validation::{normalize_username, validate_password, validate_username};
use bizpulse_core::{Account, BusinessConfig, BusinessData};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::gateway::PersistenceGateway;
use crate::remote::DocumentStore;

/// Username reserved for the built-in administrator.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Credential of the built-in administrator.
///
/// Checked before the registry, so admin access survives remote outages.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

/// Directory of registered accounts.
#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn DocumentStore>,
    gateway: PersistenceGateway,
    config: Arc<StoreConfig>,
}

impl AccountDirectory {
    /// Creates a directory over the given store and data gateway.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        gateway: PersistenceGateway,
        config: Arc<StoreConfig>,
    ) -> Self {
        AccountDirectory {
            store,
            gateway,
            config,
        }
    }

    // =========================================================================
    // Registry Document
    // =========================================================================

    /// Fetches the account registry.
    ///
    /// Fails open: an unreachable store, an absent document, or a
    /// malformed one all read as an empty registry.
    async fn fetch_registry(&self) -> Vec<Account> {
        let key = self.config.registry_key();
        let deadline = self.config.remote_timeout();

        match tokio::time::timeout(deadline, self.store.get(&key)).await {
            Ok(Ok(Some(payload))) => match serde_json::from_str::<Vec<Account>>(&payload) {
                Ok(accounts) => accounts,
                Err(e) => {
                    warn!(error = %e, "Registry document is malformed, treating as empty");
                    Vec::new()
                }
            },
            Ok(Ok(None)) => {
                debug!("Registry document absent, treating as empty");
                Vec::new()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Registry read failed, treating as empty");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    seconds = deadline.as_secs(),
                    "Registry read timed out, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Rewrites the whole registry document.
    ///
    /// Unlike reads, write failures surface to the caller.
    async fn write_registry(&self, accounts: &[Account]) -> StoreResult<()> {
        let key = self.config.registry_key();
        let deadline = self.config.remote_timeout();
        let payload = serde_json::to_string(accounts)?;

        match tokio::time::timeout(deadline, self.store.put(&key, &payload)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::timeout(deadline)),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Registers a new account and seeds its business data.
    ///
    /// The returned account carries no password.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        business_config: BusinessConfig,
    ) -> StoreResult<Account> {
        validate_username(username)?;
        validate_password(password)?;
        let username = normalize_username(username);

        if username == BOOTSTRAP_ADMIN_USERNAME {
            return Err(StoreError::AlreadyExists { username });
        }

        let mut accounts = self.fetch_registry().await;

        // Entries are stored normalized; compare case-insensitively anyway
        if accounts
            .iter()
            .any(|a| a.username.to_lowercase() == username)
        {
            return Err(StoreError::AlreadyExists { username });
        }

        let account = Account {
            username: username.clone(),
            password: Some(password.to_string()),
            last_login: Utc::now(),
            is_admin: false,
        };
        accounts.push(account.clone());

        self.write_registry(&accounts).await?;

        // Seed the account's data so first load carries its config
        let initial = BusinessData {
            config: Some(business_config),
            ..BusinessData::default()
        };
        self.gateway.save(&username, &initial).await?;

        info!(username = %username, "Account registered");
        Ok(account.without_password())
    }

    /// Verifies a credential and refreshes the account's last login.
    ///
    /// Unknown usernames and wrong passwords produce the same error. The
    /// last-login refresh is best-effort; a registry write failure does
    /// not fail the login.
    pub async fn authenticate(&self, username: &str, password: &str) -> StoreResult<Account> {
        let username = normalize_username(username);

        if username == BOOTSTRAP_ADMIN_USERNAME {
            if password == BOOTSTRAP_ADMIN_PASSWORD {
                info!("Bootstrap administrator signed in");
                return Ok(Account {
                    username,
                    password: None,
                    last_login: Utc::now(),
                    is_admin: true,
                });
            }
            return Err(StoreError::InvalidCredentials);
        }

        let mut accounts = self.fetch_registry().await;

        let account = match accounts
            .iter_mut()
            .find(|a| a.username.to_lowercase() == username)
        {
            Some(account) if account.password.as_deref() == Some(password) => {
                account.last_login = Utc::now();
                account.without_password()
            }
            _ => return Err(StoreError::InvalidCredentials),
        };

        if let Err(e) = self.write_registry(&accounts).await {
            warn!(username = %username, error = %e, "Could not record last login");
        }

        info!(username = %username, "Account signed in");
        Ok(account)
    }

    /// Removes an account from the registry and purges its data.
    pub async fn delete_account(&self, username: &str) -> StoreResult<()> {
        let username = normalize_username(username);

        let mut accounts = self.fetch_registry().await;

        // A failed-open (empty) fetch lands here too, so an outage can
        // never shrink the registry: nothing is written on this path.
        let position = accounts
            .iter()
            .position(|a| a.username.to_lowercase() == username)
            .ok_or_else(|| StoreError::AccountNotFound {
                username: username.clone(),
            })?;

        accounts.remove(position);
        self.write_registry(&accounts).await?;

        if let Err(e) = self.gateway.purge(&username).await {
            warn!(username = %username, error = %e, "Could not purge business data");
        }

        info!(username = %username, "Account deleted");
        Ok(())
    }

    /// Lists registered accounts, passwords stripped.
    ///
    /// Fails open: an unreachable registry lists as empty.
    pub async fn list_accounts(&self) -> Vec<Account> {
        self.fetch_registry()
            .await
            .iter()
            .map(Account::without_password)
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DbConfig};
    use crate::remote::MemoryDocumentStore;
    use bizpulse_core::Language;

    async fn directory_with_store() -> (AccountDirectory, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = Arc::new(StoreConfig::default());
        let gateway = PersistenceGateway::new(store.clone(), db, config.clone());
        let directory = AccountDirectory::new(store.clone(), gateway, config);
        (directory, store)
    }

    fn shop_config() -> BusinessConfig {
        BusinessConfig::new("Mita Store", "Grocery", Language::Bn)
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let (directory, _store) = directory_with_store().await;

        let account = directory
            .register("  Karim ", "pass123", shop_config())
            .await
            .unwrap();
        assert_eq!(account.username, "karim");
        assert!(account.password.is_none());
        assert!(!account.is_admin);

        // Any casing and padding of the name signs in to the same account
        let signed_in = directory.authenticate("KARIM", "pass123").await.unwrap();
        assert_eq!(signed_in.username, "karim");
        assert!(signed_in.password.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_case_insensitively() {
        let (directory, _store) = directory_with_store().await;

        directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap();

        let err = directory
            .register(" KaRiM ", "other99", shop_config())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { username } if username == "karim"));
    }

    #[tokio::test]
    async fn test_reserved_admin_username_rejected() {
        let (directory, _store) = directory_with_store().await;

        let err = directory
            .register("Admin", "pass123", shop_config())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected_before_registry() {
        let (directory, store) = directory_with_store().await;
        // Validation happens first, so even a dead store yields the
        // validation error rather than Unreachable
        store.set_failing(true);

        assert!(matches!(
            directory.register("", "pass123", shop_config()).await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            directory.register("karim", "abc", shop_config()).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_registration_needs_reachable_registry() {
        let (directory, store) = directory_with_store().await;
        store.set_failing(true);

        let err = directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap_err();
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_bootstrap_admin_works_during_outage() {
        let (directory, store) = directory_with_store().await;
        store.set_failing(true);

        let admin = directory
            .authenticate("  Admin ", BOOTSTRAP_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert_eq!(admin.username, "admin");
        assert!(admin.is_admin);

        let err = directory.authenticate("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let (directory, _store) = directory_with_store().await;
        directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap();

        let unknown = directory.authenticate("nobody", "pass123").await;
        let wrong = directory.authenticate("karim", "wrong").await;

        assert!(matches!(unknown, Err(StoreError::InvalidCredentials)));
        assert!(matches!(wrong, Err(StoreError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_survives_last_login_write_failure() {
        let (directory, store) = directory_with_store().await;
        directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap();

        // Reads keep working; only the last-login rewrite fails
        store.set_failing_writes(true);

        let account = directory.authenticate("karim", "pass123").await.unwrap();
        assert_eq!(account.username, "karim");
    }

    #[tokio::test]
    async fn test_register_seeds_business_data_with_config() {
        let (directory, store) = directory_with_store().await;
        directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap();

        // Data must be readable offline right after registration
        store.set_failing(true);
        let data = directory.gateway.load("karim").await;
        let config = data.config.unwrap();
        assert_eq!(config.company_name, "Mita Store");
        assert!(config.use_margin_estimation);
    }

    #[tokio::test]
    async fn test_delete_account() {
        let (directory, store) = directory_with_store().await;
        directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap();

        directory.delete_account(" KARIM ").await.unwrap();

        let err = directory.authenticate("karim", "pass123").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));

        // Business data is purged along with the account
        store.set_failing(true);
        let data = directory.gateway.load("karim").await;
        assert!(data.config.is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_account() {
        let (directory, _store) = directory_with_store().await;

        let err = directory.delete_account("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound { username } if username == "ghost"));
    }

    #[tokio::test]
    async fn test_outage_cannot_shrink_registry_via_delete() {
        let (directory, store) = directory_with_store().await;
        directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap();

        // Registry reads fail open to empty, so the delete sees no
        // accounts and errs before writing anything back
        store.set_failing(true);
        let err = directory.delete_account("karim").await.unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound { .. }));

        store.set_failing(false);
        assert!(directory.authenticate("karim", "pass123").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let (directory, store) = directory_with_store().await;
        directory
            .register("karim", "pass123", shop_config())
            .await
            .unwrap();
        directory
            .register("mita01", "pass456", shop_config())
            .await
            .unwrap();

        let accounts = directory.list_accounts().await;
        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().all(|a| a.password.is_none()));

        store.set_failing(true);
        assert!(directory.list_accounts().await.is_empty());
    }
}
