//! Authentication endpoints of the marketplace API.

use crate::error::ApiError;
use crate::http::{endpoint, ensure_success};
use crate::session::UserProfile;
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const VERIFY_2FA_PATH: &str = "/api/v1/auth/verify-2fa";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temp_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default, alias = "access_token")]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default, alias = "two_factor_required", alias = "requires_two_factor")]
    requires_2fa: bool,
    #[serde(default)]
    temp_token: Option<String>,
}

/// Result of the first login round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated { token: String, user: UserProfile },
    /// The server wants a one-time code; `temp_token` must accompany it if present.
    TwoFactorRequired { temp_token: Option<String> },
}

/// Thin client over the login and 2FA endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    api_url: String,
}

impl AuthClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Submit credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let response = self
            .http
            .post(endpoint(&self.api_url, LOGIN_PATH))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let body: AuthResponse = ensure_success(response).await?.json().await?;

        if body.requires_2fa {
            tracing::info!(email, "second factor required");
            return Ok(LoginOutcome::TwoFactorRequired {
                temp_token: body.temp_token,
            });
        }
        authenticated(body, email)
    }

    /// Submit the one-time code after [`LoginOutcome::TwoFactorRequired`].
    pub async fn verify_two_factor(
        &self,
        email: &str,
        code: &str,
        temp_token: Option<&str>,
    ) -> Result<LoginOutcome, ApiError> {
        let response = self
            .http
            .post(endpoint(&self.api_url, VERIFY_2FA_PATH))
            .json(&VerifyRequest {
                email,
                code,
                temp_token,
            })
            .send()
            .await?;
        let body: AuthResponse = ensure_success(response).await?.json().await?;
        authenticated(body, email)
    }
}

fn authenticated(body: AuthResponse, email: &str) -> Result<LoginOutcome, ApiError> {
    let token = body
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::UnexpectedResponse("login response has no token".to_string()))?;
    let mut user = body.user.unwrap_or_default();
    if user.email.is_empty() {
        user.email = email.to_string();
    }
    Ok(LoginOutcome::Authenticated { token, user })
}
