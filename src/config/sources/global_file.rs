//! Per-user config file: `$XDG_CONFIG_HOME/agenco/config.toml` (optional).

use crate::config::paths::xdg_root;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "config.toml";

pub fn path() -> Option<PathBuf> {
    xdg_root::config_dir().ok().map(|dir| dir.join(CONFIG_FILE))
}

/// Add the global file if the config directory can be resolved. A missing file is fine.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Some(path) = path() else {
        return Ok(builder);
    };
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
}
