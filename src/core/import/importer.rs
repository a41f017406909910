//! Single-item importer
//!
//! Turns one manifest entry into a script-creation request. Every failure
//! mode is converted into a [`FileResult`] value; nothing escapes this
//! boundary as an error.

use super::types::{ErrorKind, ExtractedMetadata, FileError, FileResult, ManifestEntry};
use super::validator::validate_file;
use crate::core::content::{ContentService, CreateScriptRequest};
use tracing::debug;

/// Import one manifest entry through the content service.
pub async fn import_file(
    service: &dyn ContentService,
    entry: &ManifestEntry,
    job_id: &str,
) -> FileResult {
    let file_name = entry.file_name.trim();
    if file_name.is_empty() {
        return FileResult::failure(
            "unknown",
            FileError::new(ErrorKind::InvalidFilename, "File name is required"),
        );
    }

    let content = match entry.content.as_text() {
        Ok(content) => content,
        Err(error) => return FileResult::failure(file_name, error),
    };

    let meta = match validate_file(&content, file_name) {
        Ok(meta) => meta,
        Err(error) => return FileResult::failure(file_name, error),
    };

    let derived = ExtractedMetadata::derive(entry, Some(&meta));
    let request = CreateScriptRequest {
        title: derived.title,
        content: content.into_owned(),
        author: derived.author,
        status: derived.status,
        description: derived.description,
        tag: Some(derived.tag),
        images: derived.images,
        usage_count: Some(derived.usage_count),
        likes: Some(derived.likes),
        source_job_id: Some(job_id.to_string()),
        source_file_name: Some(file_name.to_string()),
    };

    match service.create_script(request).await {
        Ok(response) if response.is_success() => {
            debug!("Imported {} for job {}", file_name, job_id);
            FileResult::success(file_name, response.id.unwrap_or_default())
        }
        Ok(response) => FileResult::failure(
            file_name,
            FileError::new(
                ErrorKind::ScriptCreationFailed,
                response
                    .err_msg
                    .unwrap_or_else(|| "Script creation failed".to_string()),
            ),
        ),
        Err(error) => FileResult::failure(
            file_name,
            FileError::new(ErrorKind::UnknownError, error.to_string()),
        ),
    }
}
