//! Record validation applied before a record is added.

use crate::registry::record::Record;

/// Validate a record before it is persisted.
pub fn validate_record<R: Record>(record: &R) -> Result<(), String> {
    if record.name().trim().is_empty() {
        return Err(format!("{} name cannot be empty", R::KIND.label()));
    }

    if record.tags().iter().any(|tag| tag.trim().is_empty()) {
        return Err(format!(
            "{} '{}' has an empty tag",
            R::KIND.label(),
            record.name()
        ));
    }

    validate_files(record.files())
        .map_err(|e| format!("{} '{}': {}", R::KIND.label(), record.name(), e))?;

    if let Some(category) = record.category() {
        if category.trim().is_empty() {
            return Err("category cannot be empty if provided".to_string());
        }
    }

    Ok(())
}

/// Validate the file list of an agent or context.
pub fn validate_files(files: &[String]) -> Result<(), String> {
    if let Some(index) = files.iter().position(|f| f.trim().is_empty()) {
        return Err(format!("file path #{} is empty", index + 1));
    }
    Ok(())
}
