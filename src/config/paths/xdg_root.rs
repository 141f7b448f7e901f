//! XDG Base Directory utilities.

use crate::error::ApiError;
use std::path::PathBuf;

const APP_DIR: &str = "agenco";

fn resolve_home(xdg: Option<String>, home: Option<String>, fallback: &[&str]) -> Option<PathBuf> {
    if let Some(xdg) = xdg.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg));
    }
    home.filter(|v| !v.is_empty()).map(|home| {
        fallback
            .iter()
            .fold(PathBuf::from(home), |path, segment| path.join(segment))
    })
}

/// `$XDG_DATA_HOME`, otherwise `$HOME/.local/share`.
pub fn data_home() -> Option<PathBuf> {
    resolve_home(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
        &[".local", "share"],
    )
}

/// `$XDG_CONFIG_HOME`, otherwise `$HOME/.config`.
pub fn config_home() -> Option<PathBuf> {
    resolve_home(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
        &[".config"],
    )
}

/// Registry documents: `$XDG_DATA_HOME/agenco/`.
pub fn data_dir() -> Result<PathBuf, ApiError> {
    data_home().map(|d| d.join(APP_DIR)).ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine XDG data home directory (HOME not set)".to_string(),
        )
    })
}

/// Config file and session: `$XDG_CONFIG_HOME/agenco/`.
pub fn config_dir() -> Result<PathBuf, ApiError> {
    config_home().map(|d| d.join(APP_DIR)).ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xdg_variable_wins() {
        let path = resolve_home(
            Some("/xdg/data".to_string()),
            Some("/home/u".to_string()),
            &[".local", "share"],
        );
        assert_eq!(path, Some(PathBuf::from("/xdg/data")));
    }

    #[test]
    fn test_home_fallback() {
        let path = resolve_home(None, Some("/home/u".to_string()), &[".local", "share"]);
        assert_eq!(path, Some(PathBuf::from("/home/u/.local/share")));
        let path = resolve_home(Some(String::new()), Some("/home/u".to_string()), &[".config"]);
        assert_eq!(path, Some(PathBuf::from("/home/u/.config")));
    }

    #[test]
    fn test_nothing_set() {
        assert_eq!(resolve_home(None, None, &[".config"]), None);
    }
}
