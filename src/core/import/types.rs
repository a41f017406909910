//! Import pipeline types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Lifecycle status of an import job
///
/// Transitions are one-directional: pending → running → completed.
/// There is no job-level failed state; failures are recorded per file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, not yet processed
    Pending,
    /// Batches are being processed
    Running,
    /// All batches finished
    Completed,
}

impl JobStatus {
    /// Stable string form used in stored records
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One import job record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    /// Store-assigned id; empty until persisted
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Submitting user, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Manifest size, fixed at creation
    pub total_files: u32,
    pub success_count: u32,
    pub fail_count: u32,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// File names only, kept small to avoid bloating the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_summary: Option<Vec<String>>,
}

/// Categorical tag attached to every per-file failure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidFilename,
    EmptyContent,
    FileTooLarge,
    InvalidJson,
    SerializationFailed,
    InvalidContent,
    ScriptCreationFailed,
    UnknownError,
}

impl ErrorKind {
    /// Stable string form used in stored records
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFilename => "invalid_filename",
            ErrorKind::EmptyContent => "empty_content",
            ErrorKind::FileTooLarge => "file_too_large",
            ErrorKind::InvalidJson => "invalid_json",
            ErrorKind::SerializationFailed => "serialization_failed",
            ErrorKind::InvalidContent => "invalid_content",
            ErrorKind::ScriptCreationFailed => "script_creation_failed",
            ErrorKind::UnknownError => "unknown_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-file failure: a category plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether retrying could help. Validation-class failures are
    /// deterministic; only service-level and transport failures are
    /// worth another attempt.
    pub fn retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ScriptCreationFailed | ErrorKind::UnknownError
        )
    }
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of importing one manifest entry
#[derive(Debug, Clone)]
pub struct FileResult {
    pub file_name: String,
    /// Created script id on success
    pub result: Result<String, FileError>,
    /// Total attempts made, including the first
    pub attempts: u32,
}

impl FileResult {
    pub fn success(file_name: impl Into<String>, script_id: String) -> Self {
        Self {
            file_name: file_name.into(),
            result: Ok(script_id),
            attempts: 1,
        }
    }

    pub fn failure(file_name: impl Into<String>, error: FileError) -> Self {
        Self {
            file_name: file_name.into(),
            result: Err(error),
            attempts: 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Stored record of one failed file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorRecord {
    pub job_id: String,
    pub file_name: String,
    pub error_type: ErrorKind,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit log severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Debug => "debug",
        }
    }
}

/// One append-only audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLogEntry {
    /// Absent for system-level events not tied to a job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Structured event fields (event tag, counts, durations)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Script file content as submitted: either the raw text or an already
/// parsed JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Text(String),
    Structured(Value),
}

impl FileContent {
    /// Normalize to text. Structured content is serialized once here so
    /// every later stage sees a plain string.
    pub fn as_text(&self) -> Result<Cow<'_, str>, FileError> {
        match self {
            FileContent::Text(text) => Ok(Cow::Borrowed(text)),
            FileContent::Structured(value) => serde_json::to_string(value)
                .map(Cow::Owned)
                .map_err(|e| {
                    FileError::new(
                        ErrorKind::SerializationFailed,
                        format!("Failed to serialize content: {}", e),
                    )
                }),
        }
    }
}

/// Caller-provided metadata on a manifest entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

/// One file in a submitted manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub file_name: String,
    pub content: FileContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_meta: Option<ProvidedMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ManifestEntry {
    /// Entry with plain text content and no caller-provided metadata
    pub fn text(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: FileContent::Text(content.into()),
            extracted_meta: None,
            tags: Vec::new(),
            images: Vec::new(),
        }
    }
}

/// Metadata for one creation request, with every field defaulted.
///
/// Derived exactly once at the importer boundary; downstream code never
/// re-applies fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMetadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub status: String,
    /// Single category tag
    pub tag: String,
    pub images: Vec<String>,
    pub usage_count: u64,
    pub likes: u64,
}

/// Failure summary exposed to callers: `{fileName, error}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    pub file_name: String,
    pub error: String,
}
