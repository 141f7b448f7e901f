//! Content aggregation for file-backed records.
//!
//! Agents and contexts reference external files by path. Aggregation expands
//! each path, reads it, and joins labelled sections into one text blob. A
//! broken reference never aborts aggregation; it becomes an inline
//! placeholder section.

use std::io;
use std::path::PathBuf;

/// Body used for a referenced file that does not exist.
pub const FILE_NOT_FOUND: &str = "[FILE NOT FOUND]";

/// Line placed between file sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Expand environment variables and a leading `~` in a path string.
///
/// `$VAR` and `${VAR}` are replaced with the variable's value; unset
/// variables are left as written. `~` and `~/...` resolve against the user's
/// home directory.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = expand_env_vars(path);
    if expanded == "~" {
        if let Some(home) = home_dir() {
            return home;
        }
    }
    if let Some(rest) = expanded
        .strip_prefix("~/")
        .or_else(|| expanded.strip_prefix("~\\"))
    {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(expanded)
}

fn home_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let name = &braced[..end];
                match std::env::var(name) {
                    Ok(value) if !name.is_empty() => out.push_str(&value),
                    _ => out.push_str(&rest[pos..pos + 1 + 1 + end + 1]),
                }
                rest = &braced[end + 1..];
                continue;
            }
            out.push('$');
            rest = after;
            continue;
        }

        let name_len = after
            .char_indices()
            .find(|(_, c)| !is_var_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(after.len());
        if name_len == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        let name = &after[..name_len];
        match std::env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

/// Format one labelled section: `# File: <label>` followed by the body.
pub fn file_section(label: &str, body: &str) -> String {
    format!("# File: {}\n\n{}", label, body)
}

/// Join sections with [`SECTION_SEPARATOR`].
pub fn join_sections<I>(sections: I) -> String
where
    I: IntoIterator<Item = String>,
{
    sections
        .into_iter()
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Body of one referenced file; a missing file yields [`FILE_NOT_FOUND`].
fn read_body(file: &str) -> io::Result<String> {
    let expanded = expand_path(file);
    if !expanded.exists() {
        tracing::debug!(path = %file, "referenced file not found");
        return Ok(FILE_NOT_FOUND.to_string());
    }
    std::fs::read_to_string(&expanded)
}

/// Aggregate referenced files, in order, into one text.
///
/// Section headers keep the original, unexpanded path. Zero files yields an
/// empty string.
pub fn resolve_content(files: &[String]) -> String {
    join_sections(files.iter().map(|file| match read_body(file) {
        Ok(body) => file_section(file, &body),
        Err(e) => {
            tracing::warn!(path = %file, error = %e, "referenced file unreadable");
            file_section(file, &format!("[FILE UNREADABLE: {}]", e))
        }
    }))
}

/// Like [`resolve_content`], but a file that exists and cannot be read is an error.
pub fn resolve_content_checked(files: &[String]) -> io::Result<String> {
    let sections = files
        .iter()
        .map(|file| read_body(file).map(|body| file_section(file, &body)))
        .collect::<io::Result<Vec<_>>>()?;
    Ok(join_sections(sections))
}
