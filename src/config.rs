//! Configuration
//!
//! Layered with the `config` crate: built-in defaults, then the optional
//! `config.toml` in the per-user config directory (or an explicit file), then
//! `AGENCO__SECTION__KEY` environment variables, then `AGENCO_API_URL`.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
pub use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marketplace used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://api.agenco.dev";

/// Where registry documents live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// None means `$XDG_DATA_HOME/agenco`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Resolved data directory: configured value or the XDG default.
    pub fn data_dir(&self) -> Result<PathBuf, ApiError> {
        match &self.storage.data_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.clone()),
            _ => paths::xdg_root::data_dir(),
        }
    }

    /// Directory holding `config.toml` and `session.json`.
    pub fn config_dir(&self) -> Result<PathBuf, ApiError> {
        paths::xdg_root::config_dir()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let url = self.marketplace.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApiError::ConfigError(format!(
                "marketplace.api_url must be an http(s) URL, got '{}'",
                self.marketplace.api_url
            )));
        }
        Ok(())
    }
}
