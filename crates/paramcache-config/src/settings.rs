//! Settings structures.

use paramcache_core::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Application metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Cached key set and lifetime.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Remote store settings.
    #[serde(default)]
    pub store: StoreSettings,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "paramcache".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Keys to fetch, in order.
    #[serde(default)]
    pub keys: Vec<String>,
    /// Cache lifetime in milliseconds.
    #[serde(default = "default_lifetime_ms")]
    pub lifetime_ms: u64,
}

fn default_lifetime_ms() -> u64 {
    180_000
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            lifetime_ms: default_lifetime_ms(),
        }
    }
}

impl CacheSettings {
    /// Returns the cache lifetime as a Duration.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }
}

/// Remote store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Prefix prepended to every key sent to the store (e.g. `/app/prod/`).
    #[serde(default)]
    pub prefix: Option<String>,
}
