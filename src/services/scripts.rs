//! Script content service
//!
//! CRUD over script records, including the creation port the import
//! pipeline calls. Validation mirrors what the platform's admin surface
//! has always enforced, so imported and hand-created records obey the
//! same rules.

use crate::core::content::{ContentService, CreateScriptRequest, CreateScriptResponse};
use crate::core::import::validator::DEFAULT_TAG;
use crate::storage::{Condition, Query, RecordStore, SortOrder};
use crate::utils::error::{PlatformError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Collection holding script records
pub const SCRIPTS: &str = "scripts";

const ALLOWED_STATUSES: [&str; 2] = ["active", "inactive"];
const ALLOWED_TAGS: [&str; 2] = ["mystery", "casual"];

/// One script listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters and pagination for script listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            keyword: None,
            status: None,
            tag: None,
        }
    }
}

/// One page of script listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPage {
    pub list: Vec<Script>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Partial update of a script record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScriptRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Script CRUD over the record store
#[derive(Clone)]
pub struct ScriptService {
    store: Arc<dyn RecordStore>,
}

impl ScriptService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a script record. Validation problems are reported through
    /// the response envelope, not as errors.
    pub async fn create(&self, request: CreateScriptRequest) -> Result<CreateScriptResponse> {
        let problems = validate_create(&request);
        if !problems.is_empty() {
            warn!("Rejected script creation: {}", problems.join(", "));
            return Ok(CreateScriptResponse::rejected(format!(
                "Validation failed: {}",
                problems.join(", ")
            )));
        }

        let now = Utc::now();
        let script = Script {
            id: String::new(),
            title: request.title,
            content: request.content,
            author: request.author,
            status: request.status,
            tag: request
                .tag
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TAG.to_string()),
            description: request.description,
            images: request.images,
            usage_count: request.usage_count.unwrap_or(0),
            likes: request.likes.unwrap_or(0),
            source_job_id: request.source_job_id,
            source_file_name: request.source_file_name,
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert(SCRIPTS, serde_json::to_value(&script)?)
            .await?;
        info!("Created script {} ({})", id, script.title);
        Ok(CreateScriptResponse::created(id))
    }

    /// Fetch one script by id.
    pub async fn get(&self, id: &str) -> Result<Script> {
        let doc = self
            .store
            .get(SCRIPTS, id)
            .await?
            .ok_or_else(|| PlatformError::NotFound(format!("script {} not found", id)))?;
        let mut script: Script = serde_json::from_value(doc)?;
        script.id = id.to_string();
        Ok(script)
    }

    /// List scripts with filters and pagination, newest first.
    pub async fn list(&self, query: &ListQuery) -> Result<ScriptPage> {
        let mut conditions = Vec::new();

        if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
            if status == "active" {
                // Records predating the status field count as active.
                conditions.push(Condition::any(vec![
                    Condition::eq("status", json!("active")),
                    Condition::missing("status"),
                ]));
            } else {
                conditions.push(Condition::eq("status", json!(status)));
            }
        }
        if let Some(tag) = query.tag.as_deref().filter(|t| !t.is_empty()) {
            conditions.push(Condition::eq("tag", json!(tag)));
        }
        if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.is_empty()) {
            conditions.push(Condition::any(vec![
                Condition::contains("title", keyword),
                Condition::contains("author", keyword),
                Condition::contains("description", keyword),
            ]));
        }

        let page = query.page.max(1);
        let page_size = query.page_size.max(1);
        let find = Query::filtered(conditions.clone())
            .order_by("createdAt", SortOrder::Descending)
            .skip(((page - 1) * page_size) as usize)
            .limit(page_size as usize);

        let records = self.store.find(SCRIPTS, &find).await?;
        let total = self
            .store
            .count(SCRIPTS, &Query::filtered(conditions))
            .await?;

        let mut list = Vec::with_capacity(records.len());
        for record in records {
            let mut script: Script = serde_json::from_value(record.data)?;
            script.id = record.id;
            list.push(script);
        }

        Ok(ScriptPage {
            list,
            total,
            page,
            page_size,
        })
    }

    /// Apply a partial update to a script record.
    pub async fn update(&self, id: &str, request: UpdateScriptRequest) -> Result<()> {
        let problems = validate_update(&request);
        if !problems.is_empty() {
            return Err(PlatformError::Validation(format!(
                "Validation failed: {}",
                problems.join(", ")
            )));
        }

        // Surfaces a not-found error before attempting the write.
        self.get(id).await?;

        let mut patch = match serde_json::to_value(&request)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        patch.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);

        self.store
            .update(SCRIPTS, id, serde_json::Value::Object(patch))
            .await?;
        Ok(())
    }

    /// Delete a script record.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = self.store.remove(SCRIPTS, id).await?;
        if !removed {
            return Err(PlatformError::NotFound(format!("script {} not found", id)));
        }
        info!("Deleted script {}", id);
        Ok(())
    }

    /// Atomically increment the like counter.
    pub async fn like(&self, id: &str) -> Result<()> {
        self.get(id).await?;
        self.store.increment(SCRIPTS, id, "likes", 1).await?;
        self.touch(id).await
    }

    /// Atomically decrement the like counter, stopping at zero.
    pub async fn unlike(&self, id: &str) -> Result<()> {
        let script = self.get(id).await?;
        if script.likes == 0 {
            return Ok(());
        }
        self.store.increment(SCRIPTS, id, "likes", -1).await?;
        self.touch(id).await
    }

    async fn touch(&self, id: &str) -> Result<()> {
        self.store
            .update(SCRIPTS, id, json!({"updatedAt": Utc::now()}))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ContentService for ScriptService {
    async fn create_script(&self, request: CreateScriptRequest) -> Result<CreateScriptResponse> {
        self.create(request).await
    }
}

fn length(s: &str) -> usize {
    s.chars().count()
}

fn validate_create(request: &CreateScriptRequest) -> Vec<String> {
    let mut problems = Vec::new();
    if request.title.is_empty() || length(&request.title) > 200 {
        problems.push("Title must be a string of 1-200 characters".to_string());
    }
    if request.content.is_empty() {
        problems.push("Content must not be empty".to_string());
    }
    if request.author.is_empty() || length(&request.author) > 100 {
        problems.push("Author must be a string of 1-100 characters".to_string());
    }
    if !ALLOWED_STATUSES.contains(&request.status.as_str()) {
        problems.push("Status must be one of active or inactive".to_string());
    }
    if let Some(tag) = request.tag.as_deref().filter(|t| !t.trim().is_empty()) {
        if !ALLOWED_TAGS.contains(&tag) {
            problems.push("Tag must be one of mystery or casual".to_string());
        }
    }
    if length(&request.description) > 1000 {
        problems.push("Description must be at most 1000 characters".to_string());
    }
    problems
}

fn validate_update(request: &UpdateScriptRequest) -> Vec<String> {
    let mut problems = Vec::new();
    if let Some(title) = &request.title {
        if title.is_empty() || length(title) > 200 {
            problems.push("Title must be a string of 1-200 characters".to_string());
        }
    }
    if let Some(content) = &request.content {
        if content.is_empty() {
            problems.push("Content must not be empty".to_string());
        }
    }
    if let Some(author) = &request.author {
        if author.is_empty() || length(author) > 100 {
            problems.push("Author must be a string of 1-100 characters".to_string());
        }
    }
    if let Some(status) = &request.status {
        if !ALLOWED_STATUSES.contains(&status.as_str()) {
            problems.push("Status must be one of active or inactive".to_string());
        }
    }
    if let Some(tag) = &request.tag {
        if !ALLOWED_TAGS.contains(&tag.as_str()) {
            problems.push("Tag must be one of mystery or casual".to_string());
        }
    }
    if let Some(description) = &request.description {
        if length(description) > 1000 {
            problems.push("Description must be at most 1000 characters".to_string());
        }
    }
    problems
}
