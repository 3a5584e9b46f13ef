//! # Store Configuration
//!
//! Configuration for the persistence layer: where the remote document
//! service lives and where the local cache database sits on disk.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BIZPULSE_REMOTE_URL=http://kv.example.com/store                    │
//! │     BIZPULSE_NAMESPACE=bizpulse                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bizpulse/bizpulse.toml (Linux)                           │
//! │     ~/Library/Application Support/com.bizpulse.bizpulse/… (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     localhost remote, per-user cache path                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bizpulse.toml
//! [remote]
//! base_url = "http://localhost:8765/kv"
//! namespace = "bizpulse"
//! timeout_secs = 8
//!
//! [cache]
//! path = "/var/lib/bizpulse/cache.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Remote Settings
// =============================================================================

/// Settings for the remote document service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of the key-value endpoint. Document keys are appended as
    /// one path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Key namespace prefix. Lets several deployments share one service.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Per-request deadline (seconds). Applies to foreground loads and
    /// the background write-behind alike.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8765/kv".to_string()
}

fn default_namespace() -> String {
    "bizpulse".to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            base_url: default_base_url(),
            namespace: default_namespace(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Settings for the local SQLite cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Explicit database path. When unset, a per-user data directory is
    /// used, falling back to the working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CacheSettings {
    /// Resolves the effective database path.
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "bizpulse", "bizpulse")
            .map(|dirs| dirs.data_dir().join("cache.db"))
            .unwrap_or_else(|| PathBuf::from("./bizpulse-cache.db"))
    }
}

// =============================================================================
// Main Store Configuration
// =============================================================================

/// Complete persistence configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Remote document service settings.
    #[serde(default)]
    pub remote: RemoteSettings,

    /// Local cache settings.
    #[serde(default)]
    pub cache: CacheSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (bizpulse.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let url = Url::parse(&self.remote.base_url)?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(StoreError::InvalidConfig(format!(
                    "Remote URL must be http or https, got: {}",
                    other
                )));
            }
        }

        if self.remote.timeout_secs == 0 {
            return Err(StoreError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.remote.namespace.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "namespace must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BIZPULSE_REMOTE_URL") {
            debug!(url = %url, "Overriding remote URL from environment");
            self.remote.base_url = url;
        }

        if let Ok(ns) = std::env::var("BIZPULSE_NAMESPACE") {
            self.remote.namespace = ns;
        }

        if let Ok(secs) = std::env::var("BIZPULSE_TIMEOUT_SECS") {
            if let Ok(parsed) = secs.parse::<u64>() {
                self.remote.timeout_secs = parsed;
            }
        }

        if let Ok(path) = std::env::var("BIZPULSE_CACHE_PATH") {
            debug!(path = %path, "Overriding cache path from environment");
            self.cache.path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bizpulse", "bizpulse")
            .map(|dirs| dirs.config_dir().join("bizpulse.toml"))
    }

    // =========================================================================
    // Key Derivation
    // =========================================================================

    /// Remote key holding one account's business data.
    ///
    /// `username` must already be normalized (trimmed, lowercased).
    pub fn data_key(&self, username: &str) -> String {
        format!("{}_data_{}", self.remote.namespace, username)
    }

    /// Remote key holding the account registry document.
    pub fn registry_key(&self) -> String {
        format!("{}_users_registry", self.remote.namespace)
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Per-request deadline for remote calls.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
