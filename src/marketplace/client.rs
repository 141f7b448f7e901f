//! HTTP client for the marketplace publish endpoints.

use crate::error::{ApiError, StorageError};
use crate::http::{bearer, endpoint, ensure_success};
use crate::marketplace::bundle::{file_label, DirectoryBundle};
use crate::marketplace::payload::{AssetRef, PublishPayload, PublishResponse};
use crate::registry::{Agent, Context, Prompt, RecordKind};
use crate::session::SessionStore;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;

pub const PUBLISH_AGENT_PATH: &str = "/api/v1/publish/agent";
pub const PUBLISH_CONTEXT_PATH: &str = "/api/v1/publish/context";
pub const PUBLISH_PROMPT_PATH: &str = "/api/v1/prompts/publish";
pub const UPLOAD_ASSET_PATH: &str = "/api/v1/upload/asset";

fn publish_path(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Agent => PUBLISH_AGENT_PATH,
        RecordKind::Context => PUBLISH_CONTEXT_PATH,
        RecordKind::Prompt => PUBLISH_PROMPT_PATH,
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Publishes records with a bearer token.
///
/// A client without a token is valid to construct; every call then fails
/// with [`ApiError::NotLoggedIn`] before touching the network.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl MarketplaceClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Client using the stored session token (or the env fallback).
    pub fn from_session(session: &SessionStore, api_url: impl Into<String>) -> Self {
        Self::new(api_url, session.require_token().ok())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::NotLoggedIn)
    }

    /// POST `payload` to the endpoint for `kind`.
    pub async fn publish(
        &self,
        kind: RecordKind,
        payload: &PublishPayload,
    ) -> Result<PublishResponse, ApiError> {
        let token = self.token()?;
        tracing::info!(kind = %kind, name = %payload.name, api_url = %self.api_url, "publishing");

        let response = self
            .http
            .post(endpoint(&self.api_url, publish_path(kind)))
            .header(AUTHORIZATION, bearer(token))
            .json(payload)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        // Some deployments answer with an empty body.
        let text = response.text().await?;
        let published = if text.trim().is_empty() {
            PublishResponse::default()
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::UnexpectedResponse(e.to_string()))?
        };
        tracing::info!(kind = %kind, name = %payload.name, id = ?published.id, "published");
        Ok(published)
    }

    pub async fn publish_agent(&self, agent: &Agent) -> Result<PublishResponse, ApiError> {
        self.publish(RecordKind::Agent, &PublishPayload::for_agent(agent))
            .await
    }

    pub async fn publish_context(&self, context: &Context) -> Result<PublishResponse, ApiError> {
        self.publish(RecordKind::Context, &PublishPayload::for_context(context))
            .await
    }

    pub async fn publish_prompt(&self, prompt: &Prompt) -> Result<PublishResponse, ApiError> {
        self.publish(RecordKind::Prompt, &PublishPayload::for_prompt(prompt))
            .await
    }

    /// Upload one file as multipart form field `file`.
    pub async fn upload_asset(&self, path: &Path) -> Result<AssetRef, ApiError> {
        let token = self.token()?;
        let bytes = std::fs::read(path).map_err(|e| StorageError::io(path, e))?;
        let filename = file_label(path);
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.clone()));

        let response = self
            .http
            .post(endpoint(&self.api_url, UPLOAD_ASSET_PATH))
            .header(AUTHORIZATION, bearer(token))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = ensure_success(response).await?.json().await?;
        tracing::debug!(filename = %filename, url = %uploaded.url, "asset uploaded");
        Ok(AssetRef {
            filename,
            url: uploaded.url,
        })
    }

    /// Publish the top-level files of `dir` as one entry of `kind`.
    ///
    /// Assets that fail to upload are logged and left out of the payload.
    pub async fn publish_directory(
        &self,
        kind: RecordKind,
        dir: &Path,
        name: &str,
        description: &str,
    ) -> Result<PublishResponse, ApiError> {
        self.token()?;
        if name.trim().is_empty() {
            return Err(ApiError::Validation("name cannot be empty".to_string()));
        }

        let bundle = DirectoryBundle::scan(dir)?;
        if bundle.is_empty() {
            return Err(ApiError::Validation(format!(
                "'{}' contains no publishable files",
                dir.display()
            )));
        }

        let mut assets = Vec::with_capacity(bundle.assets.len());
        for path in &bundle.assets {
            match self.upload_asset(path).await {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "asset upload failed, skipping");
                }
            }
        }

        let payload = PublishPayload {
            name: name.to_string(),
            description: description.to_string(),
            content: bundle.content(),
            tags: Vec::new(),
            category: None,
            is_public: true,
            content_type: None,
            assets,
        };
        self.publish(kind, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_prompt_sends_bearer_and_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PUBLISH_PROMPT_PATH)
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::PartialJson(json!({
                "name": "greet",
                "content": "Hi there",
                "is_public": true
            })))
            .with_status(201)
            .with_body(json!({ "id": "p1", "url": "https://agenco.dev/p/p1", "action": "created" }).to_string())
            .create_async()
            .await;

        let client = MarketplaceClient::new(server.url(), Some("tok".to_string()));
        let response = client
            .publish_prompt(&Prompt::new("greet", "", "Hi there"))
            .await
            .unwrap();

        assert_eq!(response.id.as_deref(), Some("p1"));
        assert_eq!(response.action.as_deref(), Some("created"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_without_token_issues_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = MarketplaceClient::new(server.url(), None);
        let err = client
            .publish_agent(&Agent::new("deploy", "", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));

        let temp = tempfile::tempdir().unwrap();
        let err = client
            .publish_directory(RecordKind::Agent, temp.path(), "bundle", "")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_failure_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PUBLISH_CONTEXT_PATH)
            .with_status(422)
            .with_body("{\"error\":\"name taken\"}")
            .create_async()
            .await;

        let client = MarketplaceClient::new(server.url(), Some("tok".to_string()));
        let err = client
            .publish_context(&Context::new("docs", "", vec![]))
            .await
            .unwrap_err();
        match err {
            ApiError::Remote { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("name taken"));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_success_body_is_accepted() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PUBLISH_AGENT_PATH)
            .with_status(200)
            .create_async()
            .await;

        let client = MarketplaceClient::new(server.url(), Some("tok".to_string()));
        let response = client
            .publish_agent(&Agent::new("deploy", "", vec![]))
            .await
            .unwrap();
        assert_eq!(response, PublishResponse::default());
    }

    #[tokio::test]
    async fn test_directory_publish_uploads_assets() {
        let mut server = mockito::Server::new_async().await;
        let upload = server
            .mock("POST", UPLOAD_ASSET_PATH)
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(json!({ "url": "https://cdn/logo.png" }).to_string())
            .create_async()
            .await;
        let publish = server
            .mock("POST", PUBLISH_AGENT_PATH)
            .match_body(Matcher::PartialJson(json!({
                "name": "bundle",
                "content": "# File: guide.md\n\nsteps",
                "assets": [{ "filename": "logo.png", "url": "https://cdn/logo.png" }]
            })))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("guide.md"), "steps").unwrap();
        std::fs::write(temp.path().join("logo.png"), [1u8, 2, 3]).unwrap();

        let client = MarketplaceClient::new(server.url(), Some("tok".to_string()));
        client
            .publish_directory(RecordKind::Agent, temp.path(), "bundle", "")
            .await
            .unwrap();
        upload.assert_async().await;
        publish.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_asset_upload_does_not_abort_publish() {
        let mut server = mockito::Server::new_async().await;
        let _upload = server
            .mock("POST", UPLOAD_ASSET_PATH)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let publish = server
            .mock("POST", PUBLISH_CONTEXT_PATH)
            .match_body(Matcher::PartialJson(json!({ "name": "docs" })))
            .with_status(200)
            .with_body(json!({ "id": 3 }).to_string())
            .create_async()
            .await;

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "n").unwrap();
        std::fs::write(temp.path().join("chart.svg"), "<svg/>").unwrap();

        let client = MarketplaceClient::new(server.url(), Some("tok".to_string()));
        let response = client
            .publish_directory(RecordKind::Context, temp.path(), "docs", "Docs")
            .await
            .unwrap();
        assert_eq!(response.id.as_deref(), Some("3"));
        publish.assert_async().await;
    }

    #[tokio::test]
    async fn test_directory_without_files_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let client = MarketplaceClient::new("http://127.0.0.1:9", Some("tok".to_string()));
        let err = client
            .publish_directory(RecordKind::Prompt, temp.path(), "empty", "")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
