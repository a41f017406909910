//! HTTP surface tests
//!
//! Exercise the actix routes against in-memory state, asserting the
//! platform envelope and the field names external callers depend on.

use actix_web::{App, test, web};
use grimoire::config::Config;
use grimoire::server::{AppState, routes};
use grimoire::storage::InMemoryStore;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_state() -> AppState {
    let mut config = Config::default();
    // shrink pipeline delays for tests
    config.import.retry_delay_ms = 5;
    config.import.batch_pause_ms = 1;
    AppState::with_store(config, Arc::new(InMemoryStore::new()))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_endpoint() {
    let state = test_state();
    let app = app!(state);

    let request = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "healthy");
}

#[actix_web::test]
async fn test_create_job_and_follow_it() {
    let state = test_state();
    let app = app!(state);

    let request = test::TestRequest::post()
        .uri("/api/import/jobs")
        .set_json(json!({
            "manifest": [
                {"fileName": "a.json", "content": "[{\"id\":\"_meta\",\"name\":\"A\",\"author\":\"X\"},{}]"},
                {"fileName": "bad.json", "content": "{not json"}
            ],
            "processNow": true,
            "userId": "user-9"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "job created");
    assert_eq!(body["data"]["totalFiles"], 2);
    let job_id = body["data"]["jobId"].as_str().unwrap().to_string();

    // snapshot
    let request = test::TestRequest::get()
        .uri(&format!("/api/import/jobs/{}", job_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["successCount"], 1);
    assert_eq!(body["data"]["failCount"], 1);
    assert_eq!(body["data"]["ownerId"], "user-9");

    // error list
    let request = test::TestRequest::get()
        .uri(&format!("/api/import/jobs/{}/errors", job_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["jobId"], Value::from(job_id));
    let errors = body["data"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["fileName"], "bad.json");
    assert!(errors[0]["error"].as_str().unwrap().starts_with("Invalid JSON:"));
}

#[actix_web::test]
async fn test_create_job_requires_files() {
    let state = test_state();
    let app = app!(state);

    let request = test::TestRequest::post()
        .uri("/api/import/jobs")
        .set_json(json!({"totalFiles": 0}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], -1);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("totalFiles must be greater than zero")
    );
}

#[actix_web::test]
async fn test_get_missing_job_is_404() {
    let state = test_state();
    let app = app!(state);

    let request = test::TestRequest::get()
        .uri("/api/import/jobs/nope")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 404);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], 404);
}

#[actix_web::test]
async fn test_deferred_job_run_endpoint() {
    let state = test_state();
    let app = app!(state);

    let request = test::TestRequest::post()
        .uri("/api/import/jobs")
        .set_json(json!({
            "manifest": [
                {"fileName": "later.json", "content": "[{\"id\":\"_meta\",\"name\":\"L\",\"author\":\"X\"},{}]"}
            ],
            "processNow": false
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let job_id = body["data"]["jobId"].as_str().unwrap().to_string();

    let request = test::TestRequest::get()
        .uri(&format!("/api/import/jobs/{}", job_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["status"], "pending");

    let request = test::TestRequest::post()
        .uri(&format!("/api/import/jobs/{}/run", job_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "job processed");
    assert_eq!(body["data"]["success"], 1);
    assert_eq!(body["data"]["fail"], 0);

    // a second run is rejected
    let request = test::TestRequest::post()
        .uri(&format!("/api/import/jobs/{}/run", job_id))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn test_script_crud_over_http() {
    let state = test_state();
    let app = app!(state);

    // create
    let request = test::TestRequest::post()
        .uri("/api/scripts")
        .set_json(json!({
            "title": "Harbor Lights",
            "content": "[{\"id\":\"_meta\"}]",
            "author": "Ada",
            "tag": "mystery"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["code"], 0);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // get
    let request = test::TestRequest::get()
        .uri(&format!("/api/scripts/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["title"], "Harbor Lights");
    assert_eq!(body["data"]["tag"], "mystery");

    // update
    let request = test::TestRequest::put()
        .uri(&format!("/api/scripts/{}", id))
        .set_json(json!({"description": "two hours of fog"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["code"], 0);

    // like twice, unlike once
    for _ in 0..2 {
        let request = test::TestRequest::post()
            .uri(&format!("/api/scripts/{}/like", id))
            .to_request();
        test::call_service(&app, request).await;
    }
    let request = test::TestRequest::post()
        .uri(&format!("/api/scripts/{}/unlike", id))
        .to_request();
    test::call_service(&app, request).await;

    let request = test::TestRequest::get()
        .uri(&format!("/api/scripts/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["description"], "two hours of fog");

    // list
    let request = test::TestRequest::get()
        .uri("/api/scripts?keyword=harbor")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["total"], 1);

    // delete
    let request = test::TestRequest::delete()
        .uri(&format!("/api/scripts/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["code"], 0);

    let request = test::TestRequest::get()
        .uri(&format!("/api/scripts/{}", id))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 404);
}

#[actix_web::test]
async fn test_script_creation_validation_envelope() {
    let state = test_state();
    let app = app!(state);

    let request = test::TestRequest::post()
        .uri("/api/scripts")
        .set_json(json!({
            "title": "",
            "content": "[]",
            "author": "Ada"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], -1);
    assert!(body["message"].as_str().unwrap().contains("Validation failed"));
}
