use crate::error::StorageError;
use crate::storage::contract::{DocumentStorage, JsonDocument};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Flat-file JSON storage rooted at a single directory.
///
/// Each document lives at `<base_dir>/<document>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl DocumentStorage for JsonFileStorage {
    fn path_for(&self, document: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", document))
    }

    fn load(&self, document: &str) -> Result<JsonDocument, StorageError> {
        let path = self.path_for(document);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "document not found, using empty document");
                return Ok(JsonDocument::new());
            }
            Err(e) => return Err(StorageError::io(&path, e)),
        };

        serde_json::from_str(&content).map_err(|source| StorageError::Parse { path, source })
    }

    fn save(&self, document: &str, data: &JsonDocument) -> Result<(), StorageError> {
        let path = self.path_for(document);
        let mut json = serde_json::to_string_pretty(data).map_err(|source| {
            StorageError::Serialize {
                path: path.clone(),
                source,
            }
        })?;
        json.push('\n');
        write_atomic(&path, json.as_bytes())?;
        tracing::debug!(path = %path.display(), "document saved");
        Ok(())
    }
}

/// Write `contents` to `path` via a sibling temp file and rename.
///
/// Readers observe either the previous file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    write_atomic_with_mode(path, contents, None)
}

/// [`write_atomic`] for secrets: on Unix the temp file is created owner-only
/// (0600) before any byte is written, and the rename keeps that mode.
pub fn write_atomic_private(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    write_atomic_with_mode(path, contents, Some(0o600))
}

#[cfg_attr(not(unix), allow(unused_variables))]
fn write_atomic_with_mode(
    path: &Path,
    contents: &[u8],
    mode: Option<u32>,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("document"));
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = mode {
            options.mode(mode);
        }
    }

    let write = || -> std::io::Result<()> {
        let mut file = options.open(&tmp_path)?;
        // A stale temp file keeps its old mode; `mode` only applies on creation.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = mode {
                file.set_permissions(std::fs::Permissions::from_mode(mode))?;
            }
        }
        file.write_all(contents)?;
        file.sync_all()
    };
    write().map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        StorageError::io(&tmp_path, e)
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        StorageError::io(path, e)
    })
}
