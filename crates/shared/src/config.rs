//! Client configuration management.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Procurement backend configuration.
    pub backend: BackendConfig,
    /// Reference data cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Draft client-state configuration.
    #[serde(default)]
    pub drafts: DraftConfig,
}

/// Procurement backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API, e.g. `https://erp.example.com/api`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl BackendConfig {
    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reference data cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached entries per reference list.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_max_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

/// Draft client-state configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    /// Directory holding one JSON file per draft.
    #[serde(default = "default_draft_dir")]
    pub dir: PathBuf,
}

fn default_draft_dir() -> PathBuf {
    PathBuf::from(".procura/drafts")
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            dir: default_draft_dir(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `.env`, config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PROCURA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
