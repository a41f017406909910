//! Platform configuration
//!
//! Configuration models with defaults, loaded from a YAML file and
//! overridable through `GRIMOIRE_*` environment variables.

mod loader;

pub use loader::DEFAULT_CONFIG_PATH;

use crate::core::import::ImportOptions;
use crate::utils::error::{PlatformError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker thread count; actix picks a default when unset
    pub workers: Option<usize>,
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            cors_enabled: true,
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend name; only `memory` is bundled
    pub backend: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
        }
    }
}

/// Defaults for the bulk import pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub batch_size: usize,
    pub concurrency: usize,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub batch_pause_ms: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            concurrency: 3,
            retry_attempts: 2,
            retry_delay_ms: 1000,
            batch_pause_ms: 100,
        }
    }
}

impl ImportConfig {
    /// Bridge to the scheduler's options
    pub fn options(&self) -> ImportOptions {
        ImportOptions::new()
            .with_batch_size(self.batch_size)
            .with_concurrency(self.concurrency)
            .with_retry_attempts(self.retry_attempts)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_batch_pause(Duration::from_millis(self.batch_pause_ms))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Check cross-field constraints after loading.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(PlatformError::Config(
                "server.port must be nonzero".to_string(),
            ));
        }
        if self.storage.backend != "memory" {
            return Err(PlatformError::Config(format!(
                "Unsupported storage backend: {}",
                self.storage.backend
            )));
        }
        if self.import.batch_size == 0 {
            return Err(PlatformError::Config(
                "import.batch_size must be at least 1".to_string(),
            ));
        }
        if self.import.concurrency == 0 {
            return Err(PlatformError::Config(
                "import.concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
