//! Generic record registry over one JSON document.

use crate::error::{ApiError, StorageError};
use crate::registry::record::{Prompt, PromptUpdate, Record};
use crate::registry::validation::validate_record;
use crate::storage::{DocumentStorage, JsonDocument};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

/// CRUD access to every record of kind `R`.
///
/// The registry holds no records in memory. Every call re-reads the document,
/// and every mutation writes the whole document back.
pub struct Registry<R: Record> {
    storage: Arc<dyn DocumentStorage>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for Registry<R> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            _kind: PhantomData,
        }
    }
}

impl<R: Record> Registry<R> {
    pub fn new(storage: Arc<dyn DocumentStorage>) -> Self {
        Self {
            storage,
            _kind: PhantomData,
        }
    }

    /// Backing file of this registry's document.
    pub fn path(&self) -> PathBuf {
        self.storage.path_for(R::KIND.document())
    }

    fn load_document(&self) -> Result<(JsonDocument, Vec<R>), ApiError> {
        let document = R::KIND.document();
        let mut data = self.storage.load(document)?;
        let records = match data.remove(document) {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(|source| StorageError::Parse {
                path: self.path(),
                source,
            })?,
        };
        Ok((data, records))
    }

    fn persist(&self, mut data: JsonDocument, records: &[R]) -> Result<(), ApiError> {
        let value = serde_json::to_value(records).map_err(|source| StorageError::Serialize {
            path: self.path(),
            source,
        })?;
        data.insert(R::KIND.document().to_string(), value);
        self.storage.save(R::KIND.document(), &data)?;
        Ok(())
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<R>, ApiError> {
        let (_, records) = self.load_document()?;
        Ok(records)
    }

    /// Record names in insertion order.
    pub fn names(&self) -> Result<Vec<String>, ApiError> {
        Ok(self
            .list()?
            .into_iter()
            .map(|r| r.name().to_string())
            .collect())
    }

    /// First record whose name equals `name` exactly.
    pub fn get(&self, name: &str) -> Result<Option<R>, ApiError> {
        Ok(self.list()?.into_iter().find(|r| r.name() == name))
    }

    /// Get a record or fail with `NotFound`.
    pub fn get_or_error(&self, name: &str) -> Result<R, ApiError> {
        self.get(name)?.ok_or_else(|| ApiError::NotFound {
            kind: R::KIND.label(),
            name: name.to_string(),
        })
    }

    /// Append a record. Fails if any stored record already has the same name.
    pub fn add(&self, record: R) -> Result<R, ApiError> {
        validate_record(&record).map_err(ApiError::Validation)?;

        let (data, mut records) = self.load_document()?;
        if records.iter().any(|r| r.name() == record.name()) {
            return Err(ApiError::DuplicateName {
                kind: R::KIND.label(),
                name: record.name().to_string(),
            });
        }

        records.push(record.clone());
        self.persist(data, &records)?;
        tracing::info!(kind = %R::KIND, name = record.name(), "record added");
        Ok(record)
    }

    /// Remove the first record named `name`. Returns false if none exists.
    pub fn remove(&self, name: &str) -> Result<bool, ApiError> {
        let (data, mut records) = self.load_document()?;
        let Some(index) = records.iter().position(|r| r.name() == name) else {
            return Ok(false);
        };

        records.remove(index);
        self.persist(data, &records)?;
        tracing::info!(kind = %R::KIND, name, "record removed");
        Ok(true)
    }

    /// Text body of a record, or `None` if the record does not exist.
    pub fn content(&self, name: &str) -> Result<Option<String>, ApiError> {
        Ok(self.get(name)?.map(|r| r.content()))
    }

    pub fn count(&self) -> Result<usize, ApiError> {
        Ok(self.list()?.len())
    }
}

impl Registry<Prompt> {
    /// Merge `update` into the named prompt and persist it.
    pub fn update(&self, name: &str, update: PromptUpdate) -> Result<Option<Prompt>, ApiError> {
        let (data, mut records) = self.load_document()?;
        let Some(prompt) = records.iter_mut().find(|p| p.name == name) else {
            return Ok(None);
        };

        prompt.apply(update);
        let updated = prompt.clone();
        self.persist(data, &records)?;
        tracing::info!(name, "prompt updated");
        Ok(Some(updated))
    }
}
