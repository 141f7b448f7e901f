//! Registries for agents, contexts, and prompts.
//!
//! One generic [`Registry`] handles CRUD for every record kind; [`Registries`]
//! bundles the three instances over a shared document storage.

pub mod record;
pub mod store;
pub mod validation;

pub use record::{Agent, Context, Prompt, PromptUpdate, Record, RecordKind};
pub use store::Registry;

use crate::error::ApiError;
use crate::storage::{DocumentStorage, JsonFileStorage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Record counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub agents: usize,
    pub contexts: usize,
    pub prompts: usize,
}

impl RegistryStats {
    pub fn total(&self) -> usize {
        self.agents + self.contexts + self.prompts
    }
}

/// The three registries sharing one storage backend.
#[derive(Clone)]
pub struct Registries {
    pub agents: Registry<Agent>,
    pub contexts: Registry<Context>,
    pub prompts: Registry<Prompt>,
}

impl Registries {
    /// Open registries stored as JSON files under `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_storage(Arc::new(JsonFileStorage::new(data_dir)))
    }

    pub fn with_storage(storage: Arc<dyn DocumentStorage>) -> Self {
        Self {
            agents: Registry::new(Arc::clone(&storage)),
            contexts: Registry::new(Arc::clone(&storage)),
            prompts: Registry::new(storage),
        }
    }

    pub fn stats(&self) -> Result<RegistryStats, ApiError> {
        Ok(RegistryStats {
            agents: self.agents.count()?,
            contexts: self.contexts.count()?,
            prompts: self.prompts.count()?,
        })
    }

    /// Text body of a record of any kind.
    pub fn content(&self, kind: RecordKind, name: &str) -> Result<Option<String>, ApiError> {
        match kind {
            RecordKind::Agent => self.agents.content(name),
            RecordKind::Context => self.contexts.content(name),
            RecordKind::Prompt => self.prompts.content(name),
        }
    }

    pub fn names(&self, kind: RecordKind) -> Result<Vec<String>, ApiError> {
        match kind {
            RecordKind::Agent => self.agents.names(),
            RecordKind::Context => self.contexts.names(),
            RecordKind::Prompt => self.prompts.names(),
        }
    }

    pub fn remove(&self, kind: RecordKind, name: &str) -> Result<bool, ApiError> {
        match kind {
            RecordKind::Agent => self.agents.remove(name),
            RecordKind::Context => self.contexts.remove(name),
            RecordKind::Prompt => self.prompts.remove(name),
        }
    }
}
