//! Import job endpoints
//!
//! The caller-facing surface of the bulk import pipeline. `createJob`
//! processes synchronously when `processNow` is set; otherwise the
//! manifest is persisted and `run` picks it up later.

use super::{ApiResponse, error_response};
use crate::core::import::FailedFile;
use crate::server::state::AppState;
use crate::services::CreateJobRequest;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;

/// Configure import job routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/import/jobs")
            .route("", web::post().to(create_job))
            .route("/{id}", web::get().to(get_job))
            .route("/{id}/errors", web::get().to(get_job_errors))
            .route("/{id}/run", web::post().to(run_job)),
    );
}

async fn create_job(
    state: web::Data<AppState>,
    request: web::Json<CreateJobRequest>,
) -> ActixResult<HttpResponse> {
    match state.imports.create_job(request.into_inner()).await {
        Ok(response) => {
            Ok(ApiResponse::success_with_message("job created", response).to_http_response())
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match state.imports.get_job(&path).await {
        Ok(job) => Ok(ApiResponse::success(job).to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobErrorsResponse {
    job_id: String,
    errors: Vec<FailedFile>,
}

async fn get_job_errors(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let job_id = path.into_inner();
    match state.imports.get_job_errors(&job_id).await {
        Ok(errors) => {
            Ok(ApiResponse::success(JobErrorsResponse { job_id, errors }).to_http_response())
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn run_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match state.imports.run_job(&path).await {
        Ok(summary) => {
            Ok(ApiResponse::success_with_message("job processed", summary).to_http_response())
        }
        Err(e) => Ok(error_response(&e)),
    }
}
