//! Environment variable source: AGENCO__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Shorthand for `AGENCO__MARKETPLACE__API_URL`, applied last.
pub const API_URL_ENV_VAR: &str = "AGENCO_API_URL";

/// Add environment variable overlay to builder.
/// `AGENCO__MARKETPLACE__API_URL=...` sets `marketplace.api_url`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("AGENCO")
            .separator("__")
            .try_parsing(true),
    ))
}

pub fn api_url_override() -> Option<String> {
    std::env::var(API_URL_ENV_VAR)
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}
