//! MergeService: orchestrates sources, applies merge policy, deserializes to AppConfig.

use super::builder_with_defaults;
use crate::config::sources::{environment, global_file};
use crate::config::AppConfig;
use config::{ConfigError, File, FileFormat};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> `AGENCO__*` env -> `AGENCO_API_URL` (highest).
    pub fn load() -> Result<AppConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        Self::finish(environment::add_to_builder(builder)?.build()?)
    }

    /// Like [`MergeService::load`], but the given file replaces the global one and must exist.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let builder = builder_with_defaults()?.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(true),
        );
        Self::finish(environment::add_to_builder(builder)?.build()?)
    }

    fn finish(config: config::Config) -> Result<AppConfig, ConfigError> {
        let mut app: AppConfig = config.try_deserialize()?;
        if let Some(url) = environment::api_url_override() {
            app.marketplace.api_url = url;
        }
        tracing::debug!(api_url = %app.marketplace.api_url, "configuration loaded");
        Ok(app)
    }
}
