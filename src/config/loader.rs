//! Configuration loading
//!
//! File loading with environment-variable overrides. Every override uses
//! the `GRIMOIRE_` prefix so deployments can tune a container without
//! shipping a config file.

use super::Config;
use crate::utils::error::{PlatformError, Result};
use std::env;
use std::path::Path;
use tracing::debug;

/// Path tried when no config file is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "config/grimoire.yaml";

impl Config {
    /// Load configuration from a YAML file, then apply environment
    /// overrides and validate.
    pub async fn from_file(path: &str) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        let mut config: Config = serde_yaml::from_str(&text)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration the way the binary does: an explicit path,
    /// else the default path when present, else defaults + environment.
    pub async fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path).await,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH).await
            }
            None => {
                debug!("No config file found, using defaults");
                Self::from_env()
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = env::var("GRIMOIRE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("GRIMOIRE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| PlatformError::Config(format!("Invalid port: {}", e)))?;
        }
        if let Ok(workers) = env::var("GRIMOIRE_WORKERS") {
            self.server.workers = Some(workers.parse().map_err(|e| {
                PlatformError::Config(format!("Invalid workers count: {}", e))
            })?);
        }
        if let Ok(backend) = env::var("GRIMOIRE_STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(level) = env::var("GRIMOIRE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(batch_size) = env::var("GRIMOIRE_IMPORT_BATCH_SIZE") {
            self.import.batch_size = batch_size
                .parse()
                .map_err(|e| PlatformError::Config(format!("Invalid batch size: {}", e)))?;
        }
        if let Ok(concurrency) = env::var("GRIMOIRE_IMPORT_CONCURRENCY") {
            self.import.concurrency = concurrency
                .parse()
                .map_err(|e| PlatformError::Config(format!("Invalid concurrency: {}", e)))?;
        }
        if let Ok(retries) = env::var("GRIMOIRE_IMPORT_RETRY_ATTEMPTS") {
            self.import.retry_attempts = retries
                .parse()
                .map_err(|e| PlatformError::Config(format!("Invalid retry attempts: {}", e)))?;
        }
        if let Ok(delay) = env::var("GRIMOIRE_IMPORT_RETRY_DELAY_MS") {
            self.import.retry_delay_ms = delay
                .parse()
                .map_err(|e| PlatformError::Config(format!("Invalid retry delay: {}", e)))?;
        }
        Ok(())
    }
}
