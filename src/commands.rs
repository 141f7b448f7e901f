//! Command services: single entry point per CLI command variant.
//!
//! Own the workflow logic; the CLI and the interactive menu parse input, call
//! one method, and format the typed result.

use crate::error::ApiError;
use crate::marketplace::{MarketplaceClient, PublishResponse};
use crate::registry::{
    Agent, Context, Prompt, PromptUpdate, Record, RecordKind, Registries, RegistryStats,
};
use crate::search::{search, SearchResults};
use crate::session::{SessionStore, TwoFactorPrompt, UserProfile};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Registry CRUD, search and clipboard commands.
pub struct RegistryCommandService;

/// One row of a list command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub name: String,
    pub description: String,
    /// File count for agents/contexts, a short text preview for prompts.
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Result of a list command.
#[derive(Debug, Clone, Serialize)]
pub struct RecordListResult {
    pub kind: RecordKind,
    pub items: Vec<RecordSummary>,
}

/// Result of a show command: every stored field plus the resolved body.
#[derive(Debug, Clone, Serialize)]
pub struct RecordShowResult {
    pub kind: RecordKind,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub files: Vec<String>,
    pub content_type: Option<String>,
    pub content: String,
}

/// Result of an add command.
#[derive(Debug, Clone)]
pub struct RecordAddResult {
    pub kind: RecordKind,
    pub name: String,
    pub document: PathBuf,
}

/// Result of a remove command.
#[derive(Debug, Clone)]
pub struct RecordRemoveResult {
    pub kind: RecordKind,
    pub name: String,
}

/// Result of a copy command.
#[derive(Debug, Clone)]
pub struct RecordCopyResult {
    pub kind: RecordKind,
    pub name: String,
    pub chars: usize,
    pub copied: bool,
}

/// Fields accepted when adding an agent or a context.
#[derive(Debug, Clone, Default)]
pub struct FileRecordInput {
    pub name: String,
    pub description: String,
    pub files: Vec<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    /// Contexts only.
    pub content_type: Option<String>,
}

const PREVIEW_CHARS: usize = 50;

/// First `max` characters of `text` with an ellipsis when truncated.
pub fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn summarize<R: Record>(record: &R, detail: String) -> RecordSummary {
    RecordSummary {
        name: record.name().to_string(),
        description: record.description().to_string(),
        detail,
        tags: record.tags().to_vec(),
    }
}

fn file_count(files: &[String]) -> String {
    match files.len() {
        1 => "1 file".to_string(),
        n => format!("{} files", n),
    }
}

fn show_record<R: Record>(record: &R, content_type: Option<String>) -> RecordShowResult {
    RecordShowResult {
        kind: R::KIND,
        name: record.name().to_string(),
        description: record.description().to_string(),
        tags: record.tags().to_vec(),
        category: record.category().map(str::to_string),
        files: record.files().to_vec(),
        content_type,
        content: record.content(),
    }
}

fn not_found(kind: RecordKind, name: &str) -> ApiError {
    ApiError::NotFound {
        kind: kind.label(),
        name: name.to_string(),
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl RegistryCommandService {
    pub fn list(registries: &Registries, kind: RecordKind) -> Result<RecordListResult, ApiError> {
        let items = match kind {
            RecordKind::Agent => registries
                .agents
                .list()?
                .iter()
                .map(|a| summarize(a, file_count(&a.files)))
                .collect(),
            RecordKind::Context => registries
                .contexts
                .list()?
                .iter()
                .map(|c| summarize(c, file_count(&c.files)))
                .collect(),
            RecordKind::Prompt => registries
                .prompts
                .list()?
                .iter()
                .map(|p| summarize(p, preview(&p.prompt, PREVIEW_CHARS)))
                .collect(),
        };
        Ok(RecordListResult { kind, items })
    }

    /// Show one record; fails with `NotFound` when absent.
    pub fn show(
        registries: &Registries,
        kind: RecordKind,
        name: &str,
    ) -> Result<RecordShowResult, ApiError> {
        let shown = match kind {
            RecordKind::Agent => registries.agents.get(name)?.map(|a| show_record(&a, None)),
            RecordKind::Context => registries
                .contexts
                .get(name)?
                .map(|c| show_record(&c, c.content_type.clone())),
            RecordKind::Prompt => registries.prompts.get(name)?.map(|p| show_record(&p, None)),
        };
        shown.ok_or_else(|| not_found(kind, name))
    }

    pub fn add_agent(
        registries: &Registries,
        input: FileRecordInput,
    ) -> Result<RecordAddResult, ApiError> {
        let agent = Agent {
            name: input.name.trim().to_string(),
            description: input.description,
            files: input.files,
            tags: input.tags,
            category: normalize_optional(input.category),
            extra: Default::default(),
        };
        let agent = registries.agents.add(agent)?;
        Ok(RecordAddResult {
            kind: RecordKind::Agent,
            name: agent.name,
            document: registries.agents.path(),
        })
    }

    pub fn add_context(
        registries: &Registries,
        input: FileRecordInput,
    ) -> Result<RecordAddResult, ApiError> {
        let context = Context {
            name: input.name.trim().to_string(),
            description: input.description,
            files: input.files,
            tags: input.tags,
            category: normalize_optional(input.category),
            content_type: normalize_optional(input.content_type),
            extra: Default::default(),
        };
        let context = registries.contexts.add(context)?;
        Ok(RecordAddResult {
            kind: RecordKind::Context,
            name: context.name,
            document: registries.contexts.path(),
        })
    }

    /// Add a prompt. Empty prompt text is rejected.
    pub fn add_prompt(
        registries: &Registries,
        name: &str,
        description: &str,
        text: &str,
        tags: Vec<String>,
        category: Option<String>,
    ) -> Result<RecordAddResult, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation("Prompt text cannot be empty".to_string()));
        }
        let mut prompt = Prompt::new(name.trim(), description, text);
        prompt.tags = tags;
        prompt.category = normalize_optional(category);
        let prompt = registries.prompts.add(prompt)?;
        Ok(RecordAddResult {
            kind: RecordKind::Prompt,
            name: prompt.name,
            document: registries.prompts.path(),
        })
    }

    /// Merge description and/or text into an existing prompt.
    pub fn update_prompt(
        registries: &Registries,
        name: &str,
        update: PromptUpdate,
    ) -> Result<Prompt, ApiError> {
        if update.is_empty() {
            return Err(ApiError::Validation(
                "Nothing to update: pass --description and/or --text".to_string(),
            ));
        }
        if update.prompt.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ApiError::Validation("Prompt text cannot be empty".to_string()));
        }
        registries
            .prompts
            .update(name, update)?
            .ok_or_else(|| not_found(RecordKind::Prompt, name))
    }

    pub fn remove(
        registries: &Registries,
        kind: RecordKind,
        name: &str,
    ) -> Result<RecordRemoveResult, ApiError> {
        if !registries.remove(kind, name)? {
            return Err(not_found(kind, name));
        }
        Ok(RecordRemoveResult {
            kind,
            name: name.to_string(),
        })
    }

    /// Resolve a record's body and hand it to `copier` (normally the system clipboard).
    pub fn copy<F>(
        registries: &Registries,
        kind: RecordKind,
        name: &str,
        copier: F,
    ) -> Result<RecordCopyResult, ApiError>
    where
        F: FnOnce(&str) -> bool,
    {
        let content = registries
            .content(kind, name)?
            .ok_or_else(|| not_found(kind, name))?;
        let copied = copier(&content);
        Ok(RecordCopyResult {
            kind,
            name: name.to_string(),
            chars: content.chars().count(),
            copied,
        })
    }

    /// Search all registries; a blank query is rejected.
    pub fn search(registries: &Registries, query: &str) -> Result<SearchResults, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::Validation("Search query cannot be empty".to_string()));
        }
        search(registries, query)
    }

    pub fn stats(registries: &Registries) -> Result<RegistryStats, ApiError> {
        registries.stats()
    }
}

/// Login, logout, whoami and publish commands.
pub struct MarketplaceCommandService;

/// Result of whoami.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhoAmIResult {
    LoggedIn { user: UserProfile, api_url: String },
    /// No stored session, but `AGENCO_TOKEN` is available for publishing.
    TokenOnly,
    LoggedOut,
}

/// Result of a publish command.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub kind: RecordKind,
    pub name: String,
    pub response: PublishResponse,
}

impl MarketplaceCommandService {
    pub async fn login(
        session: &SessionStore,
        email: &str,
        password: &str,
        api_url: &str,
        two_factor: &dyn TwoFactorPrompt,
    ) -> Result<UserProfile, ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        let stored = session.login(email, password, api_url, two_factor).await?;
        Ok(stored.user)
    }

    /// Returns whether a session was removed.
    pub fn logout(session: &SessionStore) -> Result<bool, ApiError> {
        session.logout()
    }

    pub fn whoami(session: &SessionStore) -> Result<WhoAmIResult, ApiError> {
        if let Some(stored) = session.load()?.filter(|s| !s.token.is_empty()) {
            return Ok(WhoAmIResult::LoggedIn {
                user: stored.user,
                api_url: stored.api_url,
            });
        }
        Ok(match session.require_token() {
            Ok(_) => WhoAmIResult::TokenOnly,
            Err(_) => WhoAmIResult::LoggedOut,
        })
    }

    /// Publish a stored record. Unknown names fail before any request is made.
    pub async fn publish(
        registries: &Registries,
        client: &MarketplaceClient,
        kind: RecordKind,
        name: &str,
    ) -> Result<PublishResult, ApiError> {
        let response = match kind {
            RecordKind::Agent => {
                let agent = registries.agents.get_or_error(name)?;
                client.publish_agent(&agent).await?
            }
            RecordKind::Context => {
                let context = registries.contexts.get_or_error(name)?;
                client.publish_context(&context).await?
            }
            RecordKind::Prompt => {
                let prompt = registries.prompts.get_or_error(name)?;
                client.publish_prompt(&prompt).await?
            }
        };
        Ok(PublishResult {
            kind,
            name: name.to_string(),
            response,
        })
    }

    pub async fn publish_directory(
        client: &MarketplaceClient,
        kind: RecordKind,
        dir: &Path,
        name: &str,
        description: &str,
    ) -> Result<PublishResult, ApiError> {
        let response = client
            .publish_directory(kind, dir, name, description)
            .await?;
        Ok(PublishResult {
            kind,
            name: name.to_string(),
            response,
        })
    }
}
