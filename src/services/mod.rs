//! Service layer
//!
//! Facades composing the core pipeline and the storage port.

pub mod import;
pub mod scripts;

pub use import::{CreateJobRequest, CreateJobResponse, ImportService};
pub use scripts::{ListQuery, Script, ScriptPage, ScriptService, UpdateScriptRequest};
