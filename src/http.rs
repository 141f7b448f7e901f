//! Shared helpers for the marketplace HTTP surface.

use crate::error::ApiError;
use reqwest::{Response, StatusCode};

/// Join the API base URL and an absolute endpoint path.
pub fn endpoint(api_url: &str, path: &str) -> String {
    format!("{}{}", api_url.trim_end_matches('/'), path)
}

/// Pass through 200/201 responses; anything else becomes `ApiError::Remote`.
pub async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status == StatusCode::OK || status == StatusCode::CREATED {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Remote {
        status: status.as_u16(),
        body,
    })
}

/// Value for the `Authorization` header.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
