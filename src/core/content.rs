//! Content service port
//!
//! The import pipeline creates script records through this interface.
//! Field names on the request and response are part of the platform
//! contract; external callers depend on them.

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn default_status() -> String {
    "active".to_string()
}

/// Request to create one script record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScriptRequest {
    /// Display title (1-200 characters)
    pub title: String,
    /// Raw script content
    pub content: String,
    /// Author name (1-100 characters)
    pub author: String,
    /// Listing status, `active` or `inactive`
    #[serde(default = "default_status")]
    pub status: String,
    /// Listing description
    #[serde(default)]
    pub description: String,
    /// Single category tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Preview image identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    /// Import job that produced this record, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_job_id: Option<String>,
    /// Manifest file this record was imported from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file_name: Option<String>,
}

/// Outcome of a creation request; `code == 0` means success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScriptResponse {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "errMsg", default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl CreateScriptResponse {
    /// Successful creation of the record with the given id
    pub fn created(id: String) -> Self {
        Self {
            code: 0,
            id: Some(id),
            err_msg: None,
        }
    }

    /// Rejected creation with a service-reported message
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            code: -1,
            id: None,
            err_msg: Some(message.into()),
        }
    }

    /// Whether the service accepted the request
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Port through which script records are created
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Create one script record. An `Ok` response with a nonzero code is a
    /// service-level rejection; an `Err` is a transport-level failure.
    async fn create_script(&self, request: CreateScriptRequest) -> Result<CreateScriptResponse>;
}
