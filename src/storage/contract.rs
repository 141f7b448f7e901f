use crate::error::StorageError;
use std::path::PathBuf;

/// Top-level JSON object of a stored document.
pub type JsonDocument = serde_json::Map<String, serde_json::Value>;

/// Persistence port for named JSON documents (`agents`, `contexts`, `prompts`).
pub trait DocumentStorage: Send + Sync {
    /// Backing location for a document name.
    fn path_for(&self, document: &str) -> PathBuf;

    /// Load a document. A missing backing file yields an empty object.
    fn load(&self, document: &str) -> Result<JsonDocument, StorageError>;

    /// Replace the whole document.
    fn save(&self, document: &str, data: &JsonDocument) -> Result<(), StorageError>;
}
