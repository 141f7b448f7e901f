//! Merge policy: defaults every layered build starts from.

pub mod service;

use super::DEFAULT_API_URL;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder pre-seeded with built-in defaults (lowest precedence).
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("marketplace.api_url", DEFAULT_API_URL)?
        .set_default("logging.level", "info")?
        .set_default("logging.output", "file")
}
