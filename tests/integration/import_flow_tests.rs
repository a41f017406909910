//! End-to-end import flow tests
//!
//! Drive whole manifests through the import service backed by the real
//! script service, asserting job state, error records, and the created
//! content.

use crate::common::{
    CountUpdateFailingStore, EventuallyHealthyService, RejectingService, fast_options, platform,
    valid_entry,
};
use grimoire::core::import::ledger::collections;
use grimoire::core::import::{JobStatus, ManifestEntry};
use grimoire::services::{CreateJobRequest, ImportService, ListQuery, ScriptService};
use grimoire::storage::{Condition, Query, RecordStore};
use serde_json::json;
use std::sync::Arc;

fn manifest_request(entries: Vec<ManifestEntry>) -> CreateJobRequest {
    CreateJobRequest {
        manifest: Some(entries),
        process_now: true,
        ..CreateJobRequest::default()
    }
}

async fn error_types(store: &dyn RecordStore, job_id: &str) -> Vec<String> {
    let query = Query::filtered(vec![Condition::eq("jobId", json!(job_id))]);
    store
        .find(collections::ERRORS, &query)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.data["errorType"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_single_valid_file_completes_cleanly() {
    let (_, scripts, imports) = platform();

    let entry = ManifestEntry::text(
        "a.json",
        r#"[{"id":"_meta","name":"A","author":"X"},{}]"#,
    );
    let response = imports.create_job(manifest_request(vec![entry])).await.unwrap();

    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.success_count, 1);
    assert_eq!(job.fail_count, 0);
    assert!(imports.get_job_errors(&response.job_id).await.unwrap().is_empty());

    // the script landed with metadata from the sentinel object
    let page = scripts.list(&ListQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.list[0].title, "A");
    assert_eq!(page.list[0].author, "X");
    assert_eq!(page.list[0].source_file_name.as_deref(), Some("a.json"));
}

#[tokio::test]
async fn test_invalid_json_is_recorded_with_specific_type() {
    let (store, _, imports) = platform();

    let entry = ManifestEntry::text("bad.json", "{not json");
    let response = imports.create_job(manifest_request(vec![entry])).await.unwrap();

    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.fail_count, 1);

    let types = error_types(store.as_ref(), &response.job_id).await;
    assert_eq!(types, vec!["invalid_json"]);
}

#[tokio::test]
async fn test_empty_array_fails_validation() {
    let (_, _, imports) = platform();

    let entry = ManifestEntry::text("empty.json", "[]");
    let response = imports.create_job(manifest_request(vec![entry])).await.unwrap();

    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.fail_count, 1);

    let errors = imports.get_job_errors(&response.job_id).await.unwrap();
    assert_eq!(errors[0].error, "JSON array must not be empty");
}

#[tokio::test]
async fn test_missing_sentinel_fails_validation() {
    let (_, _, imports) = platform();

    let entry = ManifestEntry::text("plain.json", r#"[{"id":"x"}]"#);
    let response = imports.create_job(manifest_request(vec![entry])).await.unwrap();

    let errors = imports.get_job_errors(&response.job_id).await.unwrap();
    assert_eq!(
        errors[0].error,
        "First element must be meta object with id \"_meta\""
    );
}

#[tokio::test]
async fn test_persistent_rejection_exhausts_retries() {
    let store = Arc::new(grimoire::storage::InMemoryStore::new());
    let service = Arc::new(RejectingService::new("dup"));
    let imports = ImportService::new(store, service.clone(), fast_options());

    let response = imports
        .create_job(manifest_request(vec![valid_entry("doomed")]))
        .await
        .unwrap();

    // default retry_attempts = 2: three total tries
    assert_eq!(service.calls(), 3);

    let errors = imports.get_job_errors(&response.job_id).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, "dup");

    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.fail_count, 1);
    assert_eq!(job.status, JobStatus::Completed);
}

#[tokio::test]
async fn test_transient_failure_recovers_without_error_record() {
    let store = Arc::new(grimoire::storage::InMemoryStore::new());
    let scripts = Arc::new(ScriptService::new(store.clone()));
    let service = Arc::new(EventuallyHealthyService::new(scripts, 1));
    let imports = ImportService::new(store, service.clone(), fast_options());

    let response = imports
        .create_job(manifest_request(vec![valid_entry("flaky")]))
        .await
        .unwrap();

    assert_eq!(service.calls(), 2);

    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.success_count, 1);
    assert_eq!(job.fail_count, 0);
    assert!(imports.get_job_errors(&response.job_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mixed_manifest_counts_add_up() {
    let (_, _, imports) = platform();

    let manifest = vec![
        valid_entry("one"),
        ManifestEntry::text("broken.json", "{not json"),
        valid_entry("two"),
        ManifestEntry::text("empty.json", ""),
        valid_entry("three"),
        ManifestEntry::text("shapeless.json", r#"{"id": "_meta"}"#),
        valid_entry("four"),
    ];
    let total = manifest.len() as u32;
    let response = imports.create_job(manifest_request(manifest)).await.unwrap();

    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.success_count, 4);
    assert_eq!(job.fail_count, 3);
    assert_eq!(job.success_count + job.fail_count, total);

    let errors = imports.get_job_errors(&response.job_id).await.unwrap();
    assert_eq!(errors.len(), 3);
}

#[tokio::test]
async fn test_large_manifest_with_small_window() {
    let (_, scripts, imports) = platform();

    // 13 files across three batches of 5 with a window of 3
    let manifest: Vec<ManifestEntry> =
        (0..13).map(|i| valid_entry(&format!("s{:02}", i))).collect();
    let response = imports.create_job(manifest_request(manifest)).await.unwrap();

    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.success_count, 13);
    assert_eq!(job.fail_count, 0);

    let page = scripts
        .list(&ListQuery {
            page_size: 50,
            ..ListQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 13);
}

#[tokio::test]
async fn test_progress_write_failures_do_not_fail_the_job() {
    let store = Arc::new(CountUpdateFailingStore::new());
    let scripts = Arc::new(ScriptService::new(store.clone()));
    let imports = ImportService::new(store.clone(), scripts, fast_options());

    let response = imports
        .create_job(manifest_request(vec![valid_entry("a"), valid_entry("b")]))
        .await
        .unwrap();

    // the run completed despite every count write failing
    assert!(store.injected() > 0);
    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.success_count, 0);
    assert_eq!(job.fail_count, 0);
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let (store, _, imports) = platform();

    let huge = "x".repeat(grimoire::core::import::MAX_FILE_SIZE + 1);
    let entry = ManifestEntry::text("huge.json", huge);
    let response = imports.create_job(manifest_request(vec![entry])).await.unwrap();

    let types = error_types(store.as_ref(), &response.job_id).await;
    assert_eq!(types, vec!["file_too_large"]);

    let errors = imports.get_job_errors(&response.job_id).await.unwrap();
    assert!(errors[0].error.contains("exceeds maximum limit"));
}

#[tokio::test]
async fn test_structured_content_is_normalized_and_imported() {
    let (_, scripts, imports) = platform();

    let entry: ManifestEntry = serde_json::from_value(json!({
        "fileName": "structured.json",
        "content": [
            {"id": "_meta", "name": "Structured", "author": "Ada"},
            {"id": "role-1"}
        ]
    }))
    .unwrap();

    let response = imports.create_job(manifest_request(vec![entry])).await.unwrap();
    let job = imports.get_job(&response.job_id).await.unwrap();
    assert_eq!(job.success_count, 1);

    let page = scripts.list(&ListQuery::default()).await.unwrap();
    assert_eq!(page.list[0].title, "Structured");
}

#[tokio::test]
async fn test_audit_trail_of_a_run() {
    let (_, _, imports) = platform();

    let response = imports
        .create_job(manifest_request(vec![valid_entry("audited")]))
        .await
        .unwrap();

    let logs = imports
        .ledger()
        .job_logs(&response.job_id, &Default::default())
        .await
        .unwrap();

    let events: Vec<&str> = logs
        .iter()
        .filter_map(|l| l.extra.get("event").and_then(|e| e.as_str()))
        .collect();
    assert!(events.contains(&"job_created"));
    assert!(events.contains(&"status_change"));
    assert!(events.contains(&"batch_completed"));
    assert!(events.contains(&"job_completed"));
}
