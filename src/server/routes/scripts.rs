//! Script content endpoints

use super::{ApiResponse, error_response};
use crate::core::content::CreateScriptRequest;
use crate::server::state::AppState;
use crate::services::{ListQuery, UpdateScriptRequest};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde_json::json;

/// Configure script CRUD routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/scripts")
            .route("", web::get().to(list_scripts))
            .route("", web::post().to(create_script))
            .route("/{id}", web::get().to(get_script))
            .route("/{id}", web::put().to(update_script))
            .route("/{id}", web::delete().to(delete_script))
            .route("/{id}/like", web::post().to(like_script))
            .route("/{id}/unlike", web::post().to(unlike_script)),
    );
}

async fn list_scripts(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ActixResult<HttpResponse> {
    match state.scripts.list(&query).await {
        Ok(page) => Ok(ApiResponse::success(page).to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn create_script(
    state: web::Data<AppState>,
    request: web::Json<CreateScriptRequest>,
) -> ActixResult<HttpResponse> {
    match state.scripts.create(request.into_inner()).await {
        Ok(response) if response.is_success() => Ok(ApiResponse::success_with_message(
            "created",
            json!({"id": response.id}),
        )
        .to_http_response()),
        Ok(response) => Ok(ApiResponse::failure(
            response.code,
            response
                .err_msg
                .unwrap_or_else(|| "Script creation failed".to_string()),
        )
        .to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_script(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match state.scripts.get(&path).await {
        Ok(script) => Ok(ApiResponse::success(script).to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn update_script(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<UpdateScriptRequest>,
) -> ActixResult<HttpResponse> {
    match state.scripts.update(&path, request.into_inner()).await {
        Ok(()) => Ok(ApiResponse::success_with_message("updated", json!({})).to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn delete_script(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match state.scripts.delete(&path).await {
        Ok(()) => Ok(ApiResponse::success_with_message("deleted", json!({})).to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn like_script(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match state.scripts.like(&path).await {
        Ok(()) => Ok(ApiResponse::success_with_message("liked", json!({})).to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn unlike_script(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match state.scripts.unlike(&path).await {
        Ok(()) => Ok(ApiResponse::success_with_message("unliked", json!({})).to_http_response()),
        Err(e) => Ok(error_response(&e)),
    }
}
