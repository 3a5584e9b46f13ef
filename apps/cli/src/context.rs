//! # Application Context
//!
//! Wires the persistence layer together once per invocation.
//!
//! ## Startup Sequence
//! 1. Load store config (TOML file, env overrides, defaults)
//! 2. Build the HTTP document store client
//! 3. Open the local cache database & run migrations
//! 4. Assemble gateway and directory on top

use anyhow::{bail, Context as _};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use bizpulse_core::Account;
use bizpulse_store::{
    AccountDirectory, Database, DbConfig, DocumentStore, HttpDocumentStore, PersistenceGateway,
    StoreConfig,
};

/// Everything a command handler needs.
pub struct AppContext {
    pub config: Arc<StoreConfig>,
    pub db: Database,
    pub gateway: PersistenceGateway,
    pub directory: AccountDirectory,
}

impl AppContext {
    /// Builds the context from the given config file (or the default one).
    pub async fn init(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Arc::new(StoreConfig::load_or_default(config_path));

        let store: Arc<dyn DocumentStore> = Arc::new(
            HttpDocumentStore::new(&config.remote.base_url, config.remote_timeout())
                .context("building remote store client")?,
        );

        let db_path = config.cache.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating cache directory {}", parent.display()))?;
        }
        debug!(path = %db_path.display(), "Opening local cache");

        let db = Database::new(DbConfig::new(db_path))
            .await
            .context("opening local cache database")?;

        let gateway = PersistenceGateway::new(store.clone(), db.clone(), config.clone());
        let directory = AccountDirectory::new(store, gateway.clone(), config.clone());

        Ok(AppContext {
            config,
            db,
            gateway,
            directory,
        })
    }

    /// Returns the signed-in account, if any.
    pub async fn session(&self) -> anyhow::Result<Option<Account>> {
        Ok(self.db.session().current().await?)
    }

    /// Returns the signed-in account or fails with a sign-in hint.
    pub async fn require_session(&self) -> anyhow::Result<Account> {
        match self.session().await? {
            Some(account) => Ok(account),
            None => bail!("not signed in. Run `bizpulse login` first"),
        }
    }

    /// Returns the signed-in account if it is the administrator.
    pub async fn require_admin(&self) -> anyhow::Result<Account> {
        let account = self.require_session().await?;
        if !account.is_admin {
            bail!("this command needs the administrator account");
        }
        Ok(account)
    }
}
