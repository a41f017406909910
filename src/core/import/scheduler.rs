//! Batch scheduler
//!
//! Drives a manifest to completion: contiguous batches in manifest order,
//! a bounded-concurrency sliding window inside each batch, and incremental
//! progress persistence through the job ledger. A failed ledger write is
//! logged and swallowed; it never aborts the run.

use super::ledger::JobLedger;
use super::retry::import_with_retry;
use super::types::{FailedFile, FileResult, ManifestEntry};
use crate::core::content::ContentService;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Tuning for one manifest run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Files per batch (default: 5)
    pub batch_size: usize,
    /// Maximum imports in flight within a batch (default: 3)
    pub concurrency: usize,
    /// Extra attempts after the first (default: 2)
    pub retry_attempts: u32,
    /// Delay between attempts (default: 1s)
    pub retry_delay: Duration,
    /// Pause between batches (default: 100ms)
    pub batch_pause: Duration,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 5,
            concurrency: 3,
            retry_attempts: 2,
            retry_delay: Duration::from_millis(1000),
            batch_pause: Duration::from_millis(100),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch size (at least 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the in-flight limit per batch (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the number of extra attempts per file
    pub fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    /// Set the delay between attempts
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Set the pause between batches
    pub fn with_batch_pause(mut self, batch_pause: Duration) -> Self {
        self.batch_pause = batch_pause;
        self
    }
}

/// Aggregate outcome of one manifest run
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub success: u32,
    pub fail: u32,
    pub errors: Vec<FailedFile>,
}

impl ImportSummary {
    fn new(total: usize) -> Self {
        Self {
            total,
            success: 0,
            fail: 0,
            errors: Vec::new(),
        }
    }
}

/// Process a manifest to completion for an existing job.
///
/// Batches run strictly in manifest order. Every entry is processed; a
/// batch larger than the concurrency limit is drained through a sliding
/// window rather than truncated. Failure of one entry never cancels its
/// siblings.
pub async fn process_manifest(
    content: &Arc<dyn ContentService>,
    ledger: &JobLedger,
    job_id: &str,
    manifest: &[ManifestEntry],
    options: &ImportOptions,
) -> ImportSummary {
    let mut summary = ImportSummary::new(manifest.len());

    for (batch_index, batch) in manifest.chunks(options.batch_size).enumerate() {
        let batch_started = Instant::now();
        debug!(
            "Processing batch {} ({} files) for job {}",
            batch_index + 1,
            batch.len(),
            job_id
        );

        let results: Vec<FileResult> = stream::iter(batch)
            .map(|entry| {
                import_with_retry(
                    content.as_ref(),
                    entry,
                    job_id,
                    options.retry_attempts,
                    options.retry_delay,
                )
            })
            .buffer_unordered(options.concurrency)
            .collect()
            .await;

        for result in results {
            match result.result {
                Ok(_) => summary.success += 1,
                Err(error) => {
                    summary.fail += 1;
                    if let Err(e) = ledger
                        .record_error(
                            job_id,
                            &result.file_name,
                            error.kind,
                            &error.message,
                            None,
                        )
                        .await
                    {
                        warn!("Failed to record error for {}: {}", result.file_name, e);
                    }
                    summary.errors.push(FailedFile {
                        file_name: result.file_name,
                        error: error.message,
                    });
                }
            }
        }

        // Progress persistence is best-effort; the run continues either way.
        if let Err(e) = ledger
            .update_counts(job_id, summary.success, summary.fail)
            .await
        {
            warn!("Failed to update progress for job {}: {}", job_id, e);
        }
        let _ = ledger
            .log_batch_completed(
                job_id,
                batch_index,
                batch.len(),
                summary.success,
                summary.fail,
                batch_started.elapsed(),
            )
            .await;

        let processed = (batch_index + 1) * options.batch_size;
        if processed < manifest.len() {
            sleep(options.batch_pause).await;
        }
    }

    summary
}
