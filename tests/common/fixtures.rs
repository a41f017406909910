//! Fixtures and service wiring helpers

use grimoire::core::content::{ContentService, CreateScriptRequest, CreateScriptResponse};
use grimoire::core::import::{ImportOptions, ManifestEntry};
use grimoire::services::{ImportService, ScriptService};
use grimoire::storage::InMemoryStore;
use grimoire::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Well-formed script file content with a `_meta` sentinel.
pub fn script_file(name: &str, author: &str, roles: usize) -> String {
    let mut items = vec![serde_json::json!({
        "id": "_meta",
        "name": name,
        "author": author,
    })];
    for i in 0..roles {
        items.push(serde_json::json!({"id": format!("role-{}", i)}));
    }
    serde_json::to_string(&items).unwrap()
}

/// Manifest entry wrapping a well-formed script file.
pub fn valid_entry(name: &str) -> ManifestEntry {
    ManifestEntry::text(format!("{}.json", name), script_file(name, "Ada", 2))
}

/// Import options with delays shrunk for tests.
pub fn fast_options() -> ImportOptions {
    ImportOptions::new()
        .with_retry_delay(Duration::from_millis(5))
        .with_batch_pause(Duration::from_millis(1))
}

/// Full wiring over one in-memory store: the script service doubles as
/// the content service for the import pipeline.
pub fn platform() -> (Arc<InMemoryStore>, Arc<ScriptService>, ImportService) {
    let store = Arc::new(InMemoryStore::new());
    let scripts = Arc::new(ScriptService::new(store.clone()));
    let imports = ImportService::new(store.clone(), scripts.clone(), fast_options());
    (store, scripts, imports)
}

/// Content service that rejects every request with a fixed message.
pub struct RejectingService {
    calls: AtomicU32,
    message: String,
}

impl RejectingService {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            message: message.into(),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentService for RejectingService {
    async fn create_script(&self, _request: CreateScriptRequest) -> Result<CreateScriptResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CreateScriptResponse::rejected(self.message.clone()))
    }
}

/// Content service that fails the first `failures` calls, then delegates
/// to the wrapped service.
pub struct EventuallyHealthyService {
    inner: Arc<dyn ContentService>,
    calls: AtomicU32,
    failures: u32,
}

impl EventuallyHealthyService {
    pub fn new(inner: Arc<dyn ContentService>, failures: u32) -> Self {
        Self {
            inner,
            calls: AtomicU32::new(0),
            failures,
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentService for EventuallyHealthyService {
    async fn create_script(&self, request: CreateScriptRequest) -> Result<CreateScriptResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Ok(CreateScriptResponse::rejected("temporarily unavailable"));
        }
        self.inner.create_script(request).await
    }
}
