//! Request and response bodies for the publish endpoints.

use crate::registry::{Agent, Context, Prompt, Record};
use serde::{Deserialize, Deserializer, Serialize};

/// Uploaded asset referenced from a directory publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub filename: String,
    pub url: String,
}

/// Body of every publish request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishPayload {
    pub name: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetRef>,
}

impl PublishPayload {
    fn from_record<R: Record>(record: &R, content: String) -> Self {
        Self {
            name: record.name().to_string(),
            description: record.description().to_string(),
            content,
            tags: record.tags().to_vec(),
            category: record.category().map(str::to_string),
            is_public: true,
            content_type: None,
            assets: Vec::new(),
        }
    }

    /// Agent payload; `content` is the aggregated file text.
    pub fn for_agent(agent: &Agent) -> Self {
        Self::from_record(agent, agent.content())
    }

    pub fn for_context(context: &Context) -> Self {
        let mut payload = Self::from_record(context, context.content());
        payload.content_type = context.content_type.clone();
        payload
    }

    /// Prompt payload; the prompt text travels as `content`.
    pub fn for_prompt(prompt: &Prompt) -> Self {
        Self::from_record(prompt, prompt.prompt.clone())
    }
}

/// What the marketplace reports after a publish. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PublishResponse {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl PublishResponse {
    /// Human-readable summary lines (`ID: ...`, `URL: ...`, `Action: ...`).
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(id) = &self.id {
            lines.push(format!("ID: {}", id));
        }
        if let Some(url) = &self.url {
            lines.push(format!("URL: {}", url));
        }
        if let Some(action) = &self.action {
            lines.push(format!("Action: {}", action));
        }
        lines
    }
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
