//! Manifest file validation
//!
//! Vets one file's content before ingestion and extracts the script-level
//! metadata carried by the sentinel meta object. Failures are values, not
//! errors; nothing here suspends.

use super::types::{ErrorKind, ExtractedMetadata, FileError, ManifestEntry};
use serde_json::Value;
use tracing::debug;

/// Maximum accepted file size (10 MiB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default category tag applied when neither the file nor the caller
/// provides one
pub const DEFAULT_TAG: &str = "casual";

/// Author marker for files whose metadata does not name one
pub const IMPORTED_AUTHOR: &str = "imported";

/// Script-level metadata extracted from a valid file
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptMeta {
    pub name: String,
    pub author: String,
    pub description: String,
    pub logo: String,
    /// Number of role entries, excluding the meta object
    pub roles_count: usize,
}

/// Validate one file and extract its metadata.
///
/// Rules are applied in order and short-circuit on the first violation:
/// non-empty content, size limit, JSON syntax, non-empty array shape, a
/// leading `_meta` sentinel object, and name/author constraints.
pub fn validate_file(content: &str, file_name: &str) -> Result<ScriptMeta, FileError> {
    if content.is_empty() {
        return Err(FileError::new(
            ErrorKind::EmptyContent,
            "Content must be a non-empty string",
        ));
    }

    if content.len() > MAX_FILE_SIZE {
        return Err(FileError::new(
            ErrorKind::FileTooLarge,
            format!(
                "File size ({}KB) exceeds maximum limit of {}KB",
                content.len() / 1024,
                MAX_FILE_SIZE / 1024
            ),
        ));
    }

    let parsed: Value = serde_json::from_str(content.trim()).map_err(|e| {
        FileError::new(ErrorKind::InvalidJson, format!("Invalid JSON: {}", e))
    })?;

    let items = parsed
        .as_array()
        .ok_or_else(|| FileError::new(ErrorKind::InvalidContent, "JSON must be an array"))?;
    if items.is_empty() {
        return Err(FileError::new(
            ErrorKind::InvalidContent,
            "JSON array must not be empty",
        ));
    }

    let meta_object = items[0]
        .as_object()
        .filter(|first| first.get("id").and_then(Value::as_str) == Some("_meta"))
        .ok_or_else(|| {
            FileError::new(
                ErrorKind::InvalidContent,
                "First element must be meta object with id \"_meta\"",
            )
        })?;

    let field = |key: &str| {
        meta_object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };
    let name = field("name");
    let author = field("author");

    if name.is_empty() || name.chars().count() > 200 {
        return Err(FileError::new(
            ErrorKind::InvalidContent,
            "Script name is required and must be <= 200 characters",
        ));
    }
    if author.is_empty() || author.chars().count() > 100 {
        return Err(FileError::new(
            ErrorKind::InvalidContent,
            "Author is required and must be <= 100 characters",
        ));
    }

    let meta = ScriptMeta {
        name,
        author,
        description: field("description"),
        logo: field("logo"),
        roles_count: items.len() - 1,
    };
    debug!("Validated {}: {} roles", file_name, meta.roles_count);
    Ok(meta)
}

impl ExtractedMetadata {
    /// Build the metadata for one creation request, merging the file's
    /// validated meta with anything the caller provided on the entry and
    /// filling every gap with a deterministic fallback.
    pub fn derive(entry: &ManifestEntry, meta: Option<&ScriptMeta>) -> Self {
        let provided = entry.extracted_meta.as_ref();
        let non_empty = |s: &String| !s.trim().is_empty();

        let title = provided
            .and_then(|p| p.title.clone().filter(non_empty))
            .or_else(|| meta.map(|m| m.name.clone()).filter(non_empty))
            .unwrap_or_else(|| file_stem(&entry.file_name).to_string());

        let author = provided
            .and_then(|p| p.author.clone().filter(non_empty))
            .or_else(|| meta.map(|m| m.author.clone()).filter(non_empty))
            .unwrap_or_else(|| IMPORTED_AUTHOR.to_string());

        let description = provided
            .and_then(|p| p.description.clone().filter(non_empty))
            .or_else(|| meta.map(|m| m.description.clone()).filter(non_empty))
            .unwrap_or_else(|| format!("Imported from {}", entry.file_name));

        let tag = provided
            .and_then(|p| p.tags.first().cloned())
            .or_else(|| entry.tags.first().cloned())
            .filter(non_empty)
            .unwrap_or_else(|| DEFAULT_TAG.to_string());

        let status = provided
            .and_then(|p| p.status.clone().filter(non_empty))
            .unwrap_or_else(|| "active".to_string());

        let images = provided
            .filter(|p| !p.images.is_empty())
            .map(|p| p.images.clone())
            .unwrap_or_else(|| entry.images.clone());

        Self {
            title,
            author,
            description,
            status,
            tag,
            images,
            usage_count: provided.and_then(|p| p.usage_count).unwrap_or(0),
            likes: provided.and_then(|p| p.likes).unwrap_or(0),
        }
    }
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
