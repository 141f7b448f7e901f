use agenco::config::AppConfig;
use agenco::session::SessionStore;
use agenco::tooling::cli::{CliContext, Commands};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// CLI context whose data and session live under `temp`.
pub fn cli_context(temp: &TempDir, api_url: &str) -> CliContext {
    let mut config = AppConfig::default();
    config.marketplace.api_url = api_url.to_string();
    let session = SessionStore::new(&temp.path().join("config"));
    CliContext::with_parts(config, temp.path().join("data"), session)
}

/// Write `body` to `name` under `temp` and return the absolute path as a string.
pub fn write_file(temp: &TempDir, name: &str, body: &str) -> String {
    let path = temp.path().join(name);
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().to_string()
}

pub fn document(temp: &TempDir, name: &str) -> PathBuf {
    temp.path().join("data").join(format!("{}.json", name))
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

pub fn run(ctx: &CliContext, command: Commands) -> String {
    ctx.execute(&command)
        .unwrap_or_else(|e| panic!("command {command:?} failed: {e}"))
}
