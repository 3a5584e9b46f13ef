//! # Store Error Types
//!
//! Error types for the persistence layer.
//!
//! ## Error Flow
//! ```text
//! sqlx::Error / reqwest::Error / serde_json::Error
//!        │
//!        ▼
//! StoreError (this module)  ← adds context and categorization
//!        │
//!        ▼
//! anyhow report at the CLI edge
//! ```
//!
//! An absent remote document is not an error: the document store client
//! returns `Ok(None)` for it, and callers substitute defaults. `StoreError`
//! is reserved for real failures plus directory outcomes (bad credentials,
//! duplicate usernames, unknown accounts).

use thiserror::Error;

/// Persistence layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Account Directory
    // =========================================================================
    /// Username already taken (or reserved).
    #[error("Account '{username}' already exists")]
    AlreadyExists { username: String },

    /// Login rejected. Deliberately does not say which part was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Directory operation targeted an unknown account.
    #[error("Account not found: {username}")]
    AccountNotFound { username: String },

    /// Input failed validation before reaching the registry.
    #[error(transparent)]
    Validation(#[from] bizpulse_core::ValidationError),

    // =========================================================================
    // Remote Document Store
    // =========================================================================
    /// The remote store could not be reached or answered with an error
    /// status.
    #[error("Remote store unreachable: {reason}")]
    Unreachable { reason: String },

    /// A remote call exceeded the configured deadline.
    #[error("Remote store timed out after {seconds}s")]
    Timeout { seconds: u64 },

    // =========================================================================
    // Local Cache (SQLite)
    // =========================================================================
    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    // =========================================================================
    // Data & Config
    // =========================================================================
    /// JSON (de)serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read or parsed.
    #[error("Failed to read config: {0}")]
    ConfigRead(String),
}

impl StoreError {
    /// Creates an Unreachable error with a reason.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        StoreError::Unreachable {
            reason: reason.into(),
        }
    }

    /// Creates a Timeout error from the configured deadline.
    pub fn timeout(deadline: std::time::Duration) -> Self {
        StoreError::Timeout {
            seconds: deadline.as_secs(),
        }
    }

    /// True for failures of the remote store itself (network, timeout).
    ///
    /// Registry *reads* treat these as an empty registry; registry *writes*
    /// and data loads use this to pick the fallback path.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            StoreError::Unreachable { .. } | StoreError::Timeout { .. }
        )
    }
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        StoreError::Unreachable { reason }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigRead(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigRead(format!("parse error: {err}"))
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidConfig(format!("invalid URL: {err}"))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
