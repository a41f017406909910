//! Retry wrapper around the single-item importer
//!
//! Adds bounded retry with a fixed delay. Validation failures are
//! deterministic and are never retried; service and transport failures
//! get `retry_attempts` extra tries, keeping the most recent error.

use super::importer::import_file;
use super::types::{FileResult, ManifestEntry};
use crate::core::content::ContentService;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Import one manifest entry, retrying transient failures.
///
/// Runs at most `1 + retry_attempts` total attempts with `retry_delay`
/// between them. The returned result carries the number of attempts made.
pub async fn import_with_retry(
    service: &dyn ContentService,
    entry: &ManifestEntry,
    job_id: &str,
    retry_attempts: u32,
    retry_delay: Duration,
) -> FileResult {
    let max_attempts = retry_attempts + 1;
    let mut attempt = 1;

    loop {
        let mut result = import_file(service, entry, job_id).await;
        result.attempts = attempt;

        match &result.result {
            Ok(_) => return result,
            Err(error) if !error.retryable() => return result,
            Err(error) => {
                if attempt >= max_attempts {
                    return result;
                }
                debug!(
                    "Retrying {} (attempt {}/{}): {}",
                    result.file_name, attempt, max_attempts, error.message
                );
            }
        }

        sleep(retry_delay).await;
        attempt += 1;
    }
}
