//! # Grimoire
//!
//! Backend for a script-listing content platform: script CRUD plus a
//! batched bulk-import pipeline with per-file validation, bounded-retry
//! creation, and job/error/audit tracking.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use grimoire::config::Config;
//! use grimoire::server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None).await?;
//!     server::run_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Importing a manifest programmatically
//!
//! ```rust,no_run
//! use grimoire::core::import::ManifestEntry;
//! use grimoire::services::{CreateJobRequest, ImportService, ScriptService};
//! use grimoire::storage::InMemoryStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> grimoire::Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let scripts = Arc::new(ScriptService::new(store.clone()));
//! let imports = ImportService::new(store, scripts, Default::default());
//!
//! let response = imports
//!     .create_job(CreateJobRequest {
//!         manifest: Some(vec![ManifestEntry::text(
//!             "manor.json",
//!             r#"[{"id":"_meta","name":"Midnight Manor","author":"Ada"},{}]"#,
//!         )]),
//!         process_now: true,
//!         ..CreateJobRequest::default()
//!     })
//!     .await?;
//! println!("imported job {}", response.job_id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::content::{ContentService, CreateScriptRequest, CreateScriptResponse};
pub use core::import::{ImportJob, ImportOptions, ImportSummary, JobLedger, JobStatus};
pub use services::{ImportService, ScriptService};
pub use utils::error::{PlatformError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
