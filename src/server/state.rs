//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::content::ContentService;
use crate::services::{ImportService, ScriptService};
use crate::storage::{InMemoryStore, RecordStore};
use crate::utils::error::{PlatformError, Result};
use std::sync::Arc;

/// Shared resources handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub imports: Arc<ImportService>,
    pub scripts: Arc<ScriptService>,
}

impl AppState {
    /// Build state from configuration, selecting the record store backend.
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match config.storage.backend.as_str() {
            "memory" => Arc::new(InMemoryStore::new()),
            other => {
                return Err(PlatformError::Config(format!(
                    "Unsupported storage backend: {}",
                    other
                )));
            }
        };
        Ok(Self::with_store(config, store))
    }

    /// Build state over an existing store. Tests use this to share the
    /// store with their assertions.
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let scripts = Arc::new(ScriptService::new(Arc::clone(&store)));
        let content: Arc<dyn ContentService> = scripts.clone();
        let imports = Arc::new(ImportService::new(store, content, config.import.options()));
        Self {
            config: Arc::new(config),
            imports,
            scripts,
        }
    }
}
