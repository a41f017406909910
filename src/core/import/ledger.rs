//! Job ledger
//!
//! Owns the import job, error, audit log, and pending-manifest records.
//! Count updates always write absolute totals so a retried persistence
//! call cannot double-count.

use super::types::{
    ErrorKind, FailedFile, ImportErrorRecord, ImportJob, ImportLogEntry, JobStatus, LogLevel,
    ManifestEntry,
};
use crate::storage::{Condition, Query, RecordStore, SortOrder};
use crate::utils::error::{PlatformError, Result};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, info};

/// Collection names used by the ledger
pub mod collections {
    pub const JOBS: &str = "import_jobs";
    pub const ERRORS: &str = "import_errors";
    pub const LOGS: &str = "import_logs";
    pub const MANIFESTS: &str = "import_manifests";
}

/// Filters for [`JobLedger::job_logs`]
#[derive(Debug, Clone)]
pub struct LogQuery {
    pub level: Option<LogLevel>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: usize,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            level: None,
            since: None,
            until: None,
            limit: 100,
        }
    }
}

/// Manages the lifecycle of import job records
#[derive(Clone)]
pub struct JobLedger {
    store: Arc<dyn RecordStore>,
}

impl JobLedger {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a pending job with zero counts.
    pub async fn create_job(
        &self,
        total_files: u32,
        owner_id: Option<String>,
        manifest_summary: Option<Vec<String>>,
    ) -> Result<String> {
        if total_files == 0 {
            return Err(PlatformError::Validation(
                "totalFiles must be greater than zero or a manifest must be provided".to_string(),
            ));
        }

        let now = Utc::now();
        let job = ImportJob {
            id: String::new(),
            owner_id,
            total_files,
            success_count: 0,
            fail_count: 0,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            manifest_summary,
        };

        let job_id = self
            .store
            .insert(collections::JOBS, serde_json::to_value(&job)?)
            .await?;
        info!("Created import job {} ({} files)", job_id, total_files);
        Ok(job_id)
    }

    /// Fetch the current snapshot of a job.
    pub async fn get_job(&self, job_id: &str) -> Result<ImportJob> {
        let doc = self
            .store
            .get(collections::JOBS, job_id)
            .await?
            .ok_or_else(|| PlatformError::NotFound(format!("job {} not found", job_id)))?;
        let mut job: ImportJob = serde_json::from_value(doc)?;
        job.id = job_id.to_string();
        Ok(job)
    }

    /// Transition a pending job to running.
    pub async fn mark_running(&self, job_id: &str) -> Result<()> {
        self.transition(job_id, JobStatus::Pending, JobStatus::Running)
            .await
    }

    /// Transition a running job to completed.
    pub async fn mark_completed(&self, job_id: &str) -> Result<()> {
        self.transition(job_id, JobStatus::Running, JobStatus::Completed)
            .await
    }

    async fn transition(&self, job_id: &str, from: JobStatus, to: JobStatus) -> Result<()> {
        let job = self.get_job(job_id).await?;
        if job.status != from {
            return Err(PlatformError::Validation(format!(
                "job {} cannot transition from {} to {}",
                job_id, job.status, to
            )));
        }

        self.store
            .update(
                collections::JOBS,
                job_id,
                json!({"status": to.as_str(), "updatedAt": Utc::now()}),
            )
            .await?;

        let _ = self
            .log_event(
                Some(job_id),
                LogLevel::Info,
                format!("Job status changed: {} -> {}", from, to),
                json!({
                    "event": "status_change",
                    "oldStatus": from.as_str(),
                    "newStatus": to.as_str(),
                }),
            )
            .await;
        Ok(())
    }

    /// Persist cumulative counts as absolute totals. Calling this twice
    /// with the same values leaves the record unchanged.
    pub async fn update_counts(&self, job_id: &str, success: u32, fail: u32) -> Result<()> {
        let job = self.get_job(job_id).await?;
        if success + fail > job.total_files {
            return Err(PlatformError::Validation(format!(
                "counts {}+{} exceed totalFiles {} for job {}",
                success, fail, job.total_files, job_id
            )));
        }

        self.store
            .update(
                collections::JOBS,
                job_id,
                json!({
                    "successCount": success,
                    "failCount": fail,
                    "updatedAt": Utc::now(),
                }),
            )
            .await?;
        Ok(())
    }

    /// Record one failed file. Error records are write-once.
    pub async fn record_error(
        &self,
        job_id: &str,
        file_name: &str,
        error_type: ErrorKind,
        message: &str,
        metadata: Option<Value>,
    ) -> Result<()> {
        let record = ImportErrorRecord {
            job_id: job_id.to_string(),
            file_name: file_name.to_string(),
            error_type,
            error: message.to_string(),
            metadata,
            created_at: Utc::now(),
        };
        self.store
            .insert(collections::ERRORS, serde_json::to_value(&record)?)
            .await?;
        Ok(())
    }

    /// List the failures recorded for a job, oldest first.
    pub async fn job_errors(&self, job_id: &str) -> Result<Vec<FailedFile>> {
        let query = Query::filtered(vec![Condition::eq("jobId", json!(job_id))])
            .order_by("createdAt", SortOrder::Ascending);
        let records = self.store.find(collections::ERRORS, &query).await?;

        let mut errors = Vec::with_capacity(records.len());
        for record in records {
            let record: ImportErrorRecord = serde_json::from_value(record.data)?;
            errors.push(FailedFile {
                file_name: record.file_name,
                error: record.error,
            });
        }
        Ok(errors)
    }

    /// Append one audit log entry. Callers decide whether a failed write
    /// matters; most sites deliberately discard the result.
    pub async fn log_event(
        &self,
        job_id: Option<&str>,
        level: LogLevel,
        message: impl Into<String>,
        extra: Value,
    ) -> Result<()> {
        let extra = match extra {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("detail".to_string(), other);
                map
            }
        };

        let entry = ImportLogEntry {
            job_id: job_id.map(str::to_string),
            level,
            message: message.into(),
            timestamp: Utc::now(),
            extra,
        };
        self.store
            .insert(collections::LOGS, serde_json::to_value(&entry)?)
            .await?;
        Ok(())
    }

    /// Audit event for job creation.
    pub async fn log_job_created(
        &self,
        job_id: &str,
        owner_id: Option<&str>,
        total_files: u32,
        process_now: bool,
    ) -> Result<()> {
        self.log_event(
            Some(job_id),
            LogLevel::Info,
            "Job created",
            json!({
                "event": "job_created",
                "userId": owner_id,
                "totalFiles": total_files,
                "processNow": process_now,
            }),
        )
        .await
    }

    /// Audit event for one finished batch.
    pub async fn log_batch_completed(
        &self,
        job_id: &str,
        batch_index: usize,
        batch_size: usize,
        success: u32,
        fail: u32,
        elapsed: StdDuration,
    ) -> Result<()> {
        self.log_event(
            Some(job_id),
            LogLevel::Info,
            format!("Batch {} completed", batch_index + 1),
            json!({
                "event": "batch_completed",
                "batchIndex": batch_index,
                "batchSize": batch_size,
                "successCount": success,
                "failCount": fail,
                "processingTime": elapsed.as_millis() as u64,
            }),
        )
        .await
    }

    /// Audit event with aggregate statistics for a finished job.
    pub async fn log_job_completed(
        &self,
        job_id: &str,
        total_files: usize,
        success: u32,
        fail: u32,
        elapsed: StdDuration,
    ) -> Result<()> {
        let success_rate = if total_files > 0 {
            (success as f64 / total_files as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };
        self.log_event(
            Some(job_id),
            LogLevel::Info,
            format!(
                "Job completed: {}/{} files successful ({}%)",
                success, total_files, success_rate
            ),
            json!({
                "event": "job_completed",
                "totalFiles": total_files,
                "successCount": success,
                "failCount": fail,
                "successRate": success_rate,
                "totalTime": elapsed.as_millis() as u64,
            }),
        )
        .await
    }

    /// Audit event for failures outside the per-file boundary.
    pub async fn log_system_error(
        &self,
        job_id: Option<&str>,
        operation: &str,
        error: &str,
    ) -> Result<()> {
        self.log_event(
            job_id,
            LogLevel::Error,
            format!("System error in {}: {}", operation, error),
            json!({
                "event": "system_error",
                "operation": operation,
                "error": error,
            }),
        )
        .await
    }

    /// Query a job's audit trail, newest first.
    pub async fn job_logs(&self, job_id: &str, query: &LogQuery) -> Result<Vec<ImportLogEntry>> {
        let mut conditions = vec![Condition::eq("jobId", json!(job_id))];
        if let Some(level) = query.level {
            conditions.push(Condition::eq("level", json!(level.as_str())));
        }
        if let Some(since) = query.since {
            conditions.push(Condition::gte("timestamp", serde_json::to_value(since)?));
        }
        if let Some(until) = query.until {
            conditions.push(Condition::lte("timestamp", serde_json::to_value(until)?));
        }

        let store_query = Query::filtered(conditions)
            .order_by("timestamp", SortOrder::Descending)
            .limit(query.limit);
        let records = self.store.find(collections::LOGS, &store_query).await?;

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            entries.push(serde_json::from_value(record.data)?);
        }
        Ok(entries)
    }

    /// Persist a pending job's manifest for deferred processing.
    pub async fn save_manifest(&self, job_id: &str, entries: &[ManifestEntry]) -> Result<()> {
        self.store
            .insert(
                collections::MANIFESTS,
                json!({
                    "jobId": job_id,
                    "entries": serde_json::to_value(entries)?,
                    "createdAt": Utc::now(),
                }),
            )
            .await?;
        Ok(())
    }

    /// Load the persisted manifest of a pending job.
    pub async fn load_manifest(&self, job_id: &str) -> Result<Vec<ManifestEntry>> {
        let query = Query::filtered(vec![Condition::eq("jobId", json!(job_id))]).limit(1);
        let mut records = self.store.find(collections::MANIFESTS, &query).await?;
        let record = records.pop().ok_or_else(|| {
            PlatformError::NotFound(format!("no stored manifest for job {}", job_id))
        })?;
        let entries = record
            .data
            .get("entries")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        Ok(serde_json::from_value(entries)?)
    }

    /// Remove transient manifest records for a job. Jobs, errors, and
    /// logs are kept.
    pub async fn cleanup_job(&self, job_id: &str) -> Result<u64> {
        let query = Query::filtered(vec![Condition::eq("jobId", json!(job_id))]);
        let removed = self
            .store
            .remove_where(collections::MANIFESTS, &query)
            .await?;
        debug!("Cleaned up {} manifest records for job {}", removed, job_id);
        Ok(removed)
    }

    /// Bulk-delete audit log entries older than the cutoff.
    pub async fn cleanup_old_logs(&self, max_age_days: u32) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(max_age_days as i64);
        let query = Query::filtered(vec![Condition::lt(
            "timestamp",
            serde_json::to_value(cutoff)?,
        )]);
        let removed = self.store.remove_where(collections::LOGS, &query).await?;
        info!("Cleaned up {} old log entries", removed);
        Ok(removed)
    }
}
