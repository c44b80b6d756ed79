use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::batch::BatchOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Policy constants for the cache + refresh pipeline. All tunable through
/// `config.toml`, none negotiated with the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// How long a cached last-run stays fresh.
    #[serde(default = "default_cache_expiry_ms")]
    pub cache_expiry_ms: u64,

    /// Maximum concurrent last-run lookups per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between consecutive batches.
    #[serde(default = "default_inter_batch_delay_ms")]
    pub inter_batch_delay_ms: u64,

    /// Period of the background refresh tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Grace period after an execution before re-fetching its record, so the
    /// backend has persisted it.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_cache_expiry_ms() -> u64 {
    60_000
}

fn default_batch_size() -> usize {
    10
}

fn default_inter_batch_delay_ms() -> u64 {
    100
}

fn default_tick_interval_ms() -> u64 {
    30_000
}

fn default_settle_delay_ms() -> u64 {
    500
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cache_expiry_ms: default_cache_expiry_ms(),
            batch_size: default_batch_size(),
            inter_batch_delay_ms: default_inter_batch_delay_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl RefreshConfig {
    pub fn cache_expiry(&self) -> Duration {
        Duration::from_millis(self.cache_expiry_ms)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            batch_size: self.batch_size.max(1),
            inter_batch_delay: Duration::from_millis(self.inter_batch_delay_ms),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
