//! # Session Store
//!
//! Persists the signed-in account between CLI invocations.
//!
//! A single-row table (`id = 1`) holds the current account as JSON. The
//! stored payload never includes the password; [`Account::without_password`]
//! is applied before serialization.
//!
//! [`Account::without_password`]: bizpulse_core::Account::without_password

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use bizpulse_core::Account;

/// Repository for the active session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    /// Creates a new SessionStore.
    pub fn new(pool: SqlitePool) -> Self {
        SessionStore { pool }
    }

    /// Records `account` as the active session, replacing any previous one.
    pub async fn init(&self, account: &Account) -> StoreResult<()> {
        let payload = serde_json::to_string(&account.without_password())?;
        let now = Utc::now().to_rfc3339();

        debug!(username = %account.username, "Opening session");

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO active_session (id, payload, updated_at)
            VALUES (1, ?1, ?2)
            "#,
        )
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the active account, or `None` when signed out.
    pub async fn current(&self) -> StoreResult<Option<Account>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM active_session WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Ends the active session, if any.
    pub async fn clear(&self) -> StoreResult<()> {
        debug!("Clearing session");

        sqlx::query("DELETE FROM active_session WHERE id = 1")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DbConfig};
    use chrono::Utc;

    fn sample_account(username: &str) -> Account {
        Account {
            username: username.to_string(),
            password: Some("secret".to_string()),
            last_login: Utc::now(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_no_session_initially() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.session().current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_init_then_current() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        session.init(&sample_account("karim")).await.unwrap();

        let active = session.current().await.unwrap().unwrap();
        assert_eq!(active.username, "karim");
        // Password is stripped before persisting
        assert!(active.password.is_none());
    }

    #[tokio::test]
    async fn test_init_replaces_previous() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        session.init(&sample_account("karim")).await.unwrap();
        session.init(&sample_account("rahim")).await.unwrap();

        let active = session.current().await.unwrap().unwrap();
        assert_eq!(active.username, "rahim");
    }

    #[tokio::test]
    async fn test_clear() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        session.init(&sample_account("karim")).await.unwrap();
        session.clear().await.unwrap();

        assert!(session.current().await.unwrap().is_none());
    }
}
