//! Record kinds stored in the registry documents.

use crate::content::{resolve_content, resolve_content_checked};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three record kinds, each persisted in its own document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Agent,
    Context,
    Prompt,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Agent, RecordKind::Context, RecordKind::Prompt];

    /// Document name and top-level field (`agents`, `contexts`, `prompts`).
    pub fn document(&self) -> &'static str {
        match self {
            RecordKind::Agent => "agents",
            RecordKind::Context => "contexts",
            RecordKind::Prompt => "prompts",
        }
    }

    /// Capitalized label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Agent => "Agent",
            RecordKind::Context => "Context",
            RecordKind::Prompt => "Prompt",
        }
    }

    pub fn parse(kind: &str) -> Option<RecordKind> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "agent" | "agents" => Some(RecordKind::Agent),
            "context" | "contexts" => Some(RecordKind::Context),
            "prompt" | "prompts" => Some(RecordKind::Prompt),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Agent => write!(f, "agent"),
            RecordKind::Context => write!(f, "context"),
            RecordKind::Prompt => write!(f, "prompt"),
        }
    }
}

/// Shared behaviour of every stored record.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync {
    const KIND: RecordKind;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn tags(&self) -> &[String];

    fn category(&self) -> Option<&str>;

    /// Referenced file paths; empty for kinds that carry their own text.
    fn files(&self) -> &[String] {
        &[]
    }

    /// Full text body: aggregated files for agents/contexts, prompt text for prompts.
    fn content(&self) -> String;

    /// Body to match search queries against; `None` when a referenced file cannot be read.
    fn searchable_content(&self) -> Option<String> {
        Some(self.content())
    }
}

/// Named bundle of instruction files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Fields this version does not model; kept so rewrites do not drop them.
    #[serde(flatten, default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Agent {
    pub fn new(name: impl Into<String>, description: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            files,
            tags: Vec::new(),
            category: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl Record for Agent {
    const KIND: RecordKind = RecordKind::Agent;

    fn files(&self) -> &[String] {
        &self.files
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn content(&self) -> String {
        resolve_content(&self.files)
    }

    fn searchable_content(&self) -> Option<String> {
        resolve_content_checked(&self.files).ok()
    }
}

/// Named bundle of reference material files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form hint about the material, e.g. `documentation` or `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Fields this version does not model; kept so rewrites do not drop them.
    #[serde(flatten, default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Context {
    pub fn new(name: impl Into<String>, description: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            files,
            tags: Vec::new(),
            category: None,
            content_type: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl Record for Context {
    const KIND: RecordKind = RecordKind::Context;

    fn files(&self) -> &[String] {
        &self.files
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn content(&self) -> String {
        resolve_content(&self.files)
    }

    fn searchable_content(&self) -> Option<String> {
        resolve_content_checked(&self.files).ok()
    }
}

/// Named text template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Fields this version does not model; kept so rewrites do not drop them.
    #[serde(flatten, default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Prompt {
    pub fn new(name: impl Into<String>, description: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prompt: prompt.into(),
            tags: Vec::new(),
            category: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Merge the supplied fields; unset fields stay untouched.
    pub fn apply(&mut self, update: PromptUpdate) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(prompt) = update.prompt {
            self.prompt = prompt;
        }
    }
}

impl Record for Prompt {
    const KIND: RecordKind = RecordKind::Prompt;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn content(&self) -> String {
        self.prompt.clone()
    }
}

/// Partial update for a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptUpdate {
    pub description: Option<String>,
    pub prompt: Option<String>,
}

impl PromptUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.prompt.is_none()
    }
}
