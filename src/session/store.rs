use crate::error::{ApiError, StorageError};
use crate::session::auth::{AuthClient, LoginOutcome};
use crate::session::{Session, TwoFactorPrompt, UserProfile};
use crate::storage::write_atomic_private;
use std::path::{Path, PathBuf};

/// File name of the session inside the per-user config directory.
pub const SESSION_FILE: &str = "session.json";

/// Environment variable consulted when no session is stored.
pub const TOKEN_ENV_VAR: &str = "AGENCO_TOKEN";

/// File-backed session at `<config_dir>/session.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    env_token: Option<String>,
}

impl SessionStore {
    pub fn new(config_dir: &Path) -> Self {
        Self::with_path(config_dir.join(SESSION_FILE))
    }

    /// Create a store at a specific path (useful for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            env_token: None,
        }
    }

    /// Fallback token used by [`SessionStore::require_token`] when no session is stored.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        self.env_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored session, if any. A malformed file is an error.
    pub fn load(&self) -> Result<Option<Session>, ApiError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e).into()),
        };
        let session = serde_json::from_str(&data).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<(), ApiError> {
        let data = serde_json::to_string_pretty(session).map_err(|source| {
            StorageError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        write_atomic_private(&self.path, data.as_bytes())?;

        tracing::info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Delete the session file. Returns whether a file was removed.
    pub fn logout(&self) -> Result<bool, ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "session removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&self.path, e).into()),
        }
    }

    fn stored_token(&self) -> Option<String> {
        match self.load() {
            Ok(session) => session.map(|s| s.token).filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "session file unreadable");
                None
            }
        }
    }

    /// True iff a non-empty token is stored.
    pub fn is_logged_in(&self) -> bool {
        self.stored_token().is_some()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.load().ok().flatten().map(|s| s.user)
    }

    /// Token for authenticated calls: stored session first, then the env fallback.
    pub fn require_token(&self) -> Result<String, ApiError> {
        self.stored_token()
            .or_else(|| self.env_token.clone())
            .ok_or(ApiError::NotLoggedIn)
    }

    /// Log in against `api_url` and persist the resulting session.
    ///
    /// When the server requires a second factor, `two_factor` supplies the
    /// one-time code for the verify round trip.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        api_url: &str,
        two_factor: &dyn TwoFactorPrompt,
    ) -> Result<Session, ApiError> {
        let client = AuthClient::new(api_url);
        let outcome = match client.login(email, password).await? {
            LoginOutcome::TwoFactorRequired { temp_token } => {
                let code = two_factor.one_time_code()?;
                let code = code.trim();
                if code.is_empty() {
                    return Err(ApiError::Validation(
                        "verification code cannot be empty".to_string(),
                    ));
                }
                client
                    .verify_two_factor(email, code, temp_token.as_deref())
                    .await?
            }
            authenticated => authenticated,
        };

        let LoginOutcome::Authenticated { token, user } = outcome else {
            return Err(ApiError::UnexpectedResponse(
                "second factor requested twice".to_string(),
            ));
        };

        let session = Session {
            token,
            user,
            api_url: api_url.to_string(),
        };
        self.save(&session)?;
        tracing::info!(email, api_url, "logged in");
        Ok(session)
    }
}
