//! Settings loader with layered sources.

use crate::Settings;
use config::{Config, ConfigError, Environment, File};
use paramcache_core::ParamError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Settings loader with runtime refresh support.
#[derive(Clone)]
pub struct SettingsLoader {
    settings: Arc<RwLock<Settings>>,
    config_dir: String,
}

impl SettingsLoader {
    /// Creates a new settings loader.
    ///
    /// Settings are loaded from multiple sources in order:
    /// 1. `{config_dir}/default.toml` - Default values
    /// 2. `{config_dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{config_dir}/local.toml` - Local overrides
    /// 4. Environment variables with `PARAMCACHE__` prefix
    ///    (e.g. `PARAMCACHE__CACHE__LIFETIME_MS=60000`,
    ///    `PARAMCACHE__CACHE__KEYS=db-url,api-key`)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, ParamError> {
        let config_dir = config_dir.into();
        let settings = Self::load_settings(&config_dir)?;

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            config_dir,
        })
    }

    /// Loads settings from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, ParamError> {
        Self::new("./config")
    }

    /// Returns the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Reloads the settings from disk and environment.
    pub async fn reload(&self) -> Result<(), ParamError> {
        let new_settings = Self::load_settings(&self.config_dir)?;
        let mut settings = self.settings.write().await;
        *settings = new_settings;
        info!("Settings reloaded successfully");
        Ok(())
    }

    fn load_settings(config_dir: &str) -> Result<Settings, ParamError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var("PARAMCACHE_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        info!("Loading settings for environment: {}", environment);

        let mut builder = Config::builder()
            .set_override("app.environment", environment.clone())
            .map_err(config_error_to_param_error)?;

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{config_dir}/{name}.toml");
            if Path::new(&path).exists() {
                debug!("Loading settings from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("PARAMCACHE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cache.keys")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_param_error)?;

        Self::validate_settings(&settings)?;

        Ok(settings)
    }

    fn validate_settings(settings: &Settings) -> Result<(), ParamError> {
        if settings.cache.keys.is_empty() {
            return Err(ParamError::Configuration("cache.keys must list at least one key".to_string()));
        }

        if settings.cache.lifetime_ms == 0 {
            return Err(ParamError::Configuration(
                "cache.lifetime_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for SettingsLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsLoader")
            .field("config_dir", &self.config_dir)
            .finish_non_exhaustive()
    }
}

fn config_error_to_param_error(err: ConfigError) -> ParamError {
    ParamError::Configuration(err.to_string())
}
