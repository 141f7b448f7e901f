//! Directory bundling for publish: text files become content, assets are uploaded.

use crate::content::{file_section, join_sections};
use crate::error::{ApiError, StorageError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEXT_EXTENSIONS: &[&str] = &[
    "md", "markdown", "txt", "json", "yaml", "yml", "toml", "py", "rs", "js", "ts", "sh",
];

const ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "pdf"];

/// How a file inside a published directory is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// Inlined into the payload `content`.
    Text,
    /// Uploaded separately and referenced by URL.
    Asset,
    Other,
}

/// Classify by extension, case-insensitively.
pub fn classify(path: &Path) -> FileClass {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileClass::Other;
    };
    let ext = ext.to_ascii_lowercase();
    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        FileClass::Text
    } else if ASSET_EXTENSIONS.contains(&ext.as_str()) {
        FileClass::Asset
    } else {
        FileClass::Other
    }
}

/// Files found at the top level of a directory, sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryBundle {
    pub text_files: Vec<PathBuf>,
    pub assets: Vec<PathBuf>,
}

impl DirectoryBundle {
    /// Scan `dir` without descending into subdirectories. Dot-files are skipped.
    pub fn scan(dir: &Path) -> Result<Self, ApiError> {
        if !dir.is_dir() {
            return Err(ApiError::Validation(format!(
                "'{}' is not a directory",
                dir.display()
            )));
        }

        let mut bundle = DirectoryBundle::default();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| StorageError::io(dir, std::io::Error::from(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.into_path();
            match classify(&path) {
                FileClass::Text => bundle.text_files.push(path),
                FileClass::Asset => bundle.assets.push(path),
                FileClass::Other => {
                    tracing::debug!(path = %path.display(), "skipping unsupported file");
                }
            }
        }

        tracing::debug!(
            dir = %dir.display(),
            text = bundle.text_files.len(),
            assets = bundle.assets.len(),
            "directory scanned"
        );
        Ok(bundle)
    }

    pub fn is_empty(&self) -> bool {
        self.text_files.is_empty() && self.assets.is_empty()
    }

    /// Text files joined in the aggregation format, labelled by file name.
    pub fn content(&self) -> String {
        join_sections(self.text_files.iter().map(|path| {
            let label = file_label(path);
            match std::fs::read_to_string(path) {
                Ok(text) => file_section(&label, &text),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "bundled file unreadable");
                    file_section(&label, &format!("[FILE UNREADABLE: {}]", e))
                }
            }
        }))
    }
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
