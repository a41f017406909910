//! Import orchestration service
//!
//! Drives the job lifecycle around the batch scheduler: job creation,
//! synchronous or deferred processing, finalization, and the read APIs
//! external callers use to follow a job.

use crate::core::content::ContentService;
use crate::core::import::ledger::JobLedger;
use crate::core::import::scheduler::{ImportOptions, ImportSummary, process_manifest};
use crate::core::import::types::{FailedFile, ImportJob, JobStatus, ManifestEntry};
use crate::storage::RecordStore;
use crate::utils::error::{PlatformError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Request to create an import job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    /// Files to import. Takes precedence over `totalFiles` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Vec<ManifestEntry>>,
    /// Expected file count for jobs created ahead of their manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<u32>,
    /// Process the manifest before returning instead of deferring
    #[serde(default)]
    pub process_now: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Response to job creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_id: String,
    pub total_files: u32,
}

/// Facade over the ledger, scheduler, and content service
pub struct ImportService {
    ledger: JobLedger,
    content: Arc<dyn ContentService>,
    options: ImportOptions,
}

impl ImportService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        content: Arc<dyn ContentService>,
        options: ImportOptions,
    ) -> Self {
        Self {
            ledger: JobLedger::new(store),
            content,
            options,
        }
    }

    /// The ledger backing this service, for maintenance operations.
    pub fn ledger(&self) -> &JobLedger {
        &self.ledger
    }

    /// Create an import job from a manifest or a bare file count.
    ///
    /// With `process_now` the manifest is processed before returning;
    /// otherwise it is persisted and waits for [`run_job`].
    ///
    /// [`run_job`]: ImportService::run_job
    pub async fn create_job(&self, request: CreateJobRequest) -> Result<CreateJobResponse> {
        let manifest = request.manifest.unwrap_or_default();
        let total_files = if manifest.is_empty() {
            request.total_files.unwrap_or(0)
        } else {
            manifest.len() as u32
        };
        if total_files == 0 {
            return Err(PlatformError::Validation(
                "totalFiles must be greater than zero or a manifest must be provided".to_string(),
            ));
        }

        let summary_names = (!manifest.is_empty())
            .then(|| manifest.iter().map(|e| e.file_name.clone()).collect());
        let job_id = self
            .ledger
            .create_job(total_files, request.user_id.clone(), summary_names)
            .await?;
        let _ = self
            .ledger
            .log_job_created(
                &job_id,
                request.user_id.as_deref(),
                total_files,
                request.process_now,
            )
            .await;

        if !manifest.is_empty() {
            if request.process_now {
                self.process(&job_id, &manifest).await?;
            } else {
                self.ledger.save_manifest(&job_id, &manifest).await?;
            }
        }

        Ok(CreateJobResponse {
            job_id,
            total_files,
        })
    }

    /// Process a pending job whose manifest was persisted at creation,
    /// then drop the stored manifest.
    pub async fn run_job(&self, job_id: &str) -> Result<ImportSummary> {
        let job = self.ledger.get_job(job_id).await?;
        if job.status != JobStatus::Pending {
            return Err(PlatformError::Validation(format!(
                "job {} has already been processed",
                job_id
            )));
        }

        let manifest = self.ledger.load_manifest(job_id).await?;
        let summary = self.process(job_id, &manifest).await?;

        if let Err(e) = self.ledger.cleanup_job(job_id).await {
            warn!("Failed to clean up manifest records for job {}: {}", job_id, e);
        }
        Ok(summary)
    }

    /// Current snapshot of a job.
    pub async fn get_job(&self, job_id: &str) -> Result<ImportJob> {
        self.ledger.get_job(job_id).await
    }

    /// Failures recorded for a job.
    pub async fn get_job_errors(&self, job_id: &str) -> Result<Vec<FailedFile>> {
        self.ledger.job_errors(job_id).await
    }

    async fn process(&self, job_id: &str, manifest: &[ManifestEntry]) -> Result<ImportSummary> {
        let started = Instant::now();
        self.ledger.mark_running(job_id).await?;
        info!(
            "Processing import job {} ({} files)",
            job_id,
            manifest.len()
        );

        let summary =
            process_manifest(&self.content, &self.ledger, job_id, manifest, &self.options).await;

        self.ledger.mark_completed(job_id).await?;
        let _ = self
            .ledger
            .log_job_completed(
                job_id,
                summary.total,
                summary.success,
                summary.fail,
                started.elapsed(),
            )
            .await;
        info!(
            "Import job {} completed: {}/{} files successful",
            job_id, summary.success, summary.total
        );
        Ok(summary)
    }
}
