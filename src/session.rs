//! Marketplace session: stored credentials and the login flow.

pub mod auth;
pub mod store;

pub use auth::{AuthClient, LoginOutcome};
pub use store::{SessionStore, SESSION_FILE, TOKEN_ENV_VAR};

use crate::error::ApiError;
use serde::{Deserialize, Deserializer, Serialize};

/// Profile of the logged-in marketplace user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Persisted session: `{ "token", "user", "api_url" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: UserProfile,
    pub api_url: String,
}

/// Source of the one-time code when the server asks for a second factor.
pub trait TwoFactorPrompt {
    fn one_time_code(&self) -> Result<String, ApiError>;
}

impl<F> TwoFactorPrompt for F
where
    F: Fn() -> Result<String, ApiError>,
{
    fn one_time_code(&self) -> Result<String, ApiError> {
        self()
    }
}
