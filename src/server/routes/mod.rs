//! HTTP route modules
//!
//! Handlers organized by resource, sharing the platform response
//! envelope. `code` is 0 on success; external callers switch on it.

pub mod health;
pub mod jobs;
pub mod scripts;

use crate::utils::error::PlatformError;
use actix_web::{HttpResponse, web};
use serde_json::Value;
use tracing::error;

/// Wire everything under one service configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    jobs::configure_routes(cfg);
    scripts::configure_routes(cfg);
}

/// Platform response envelope
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Successful response carrying data
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Successful response with a custom message
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Render as an HTTP response
    pub fn to_http_response(&self) -> HttpResponse {
        if self.code == 0 {
            HttpResponse::Ok().json(self)
        } else {
            HttpResponse::BadRequest().json(self)
        }
    }
}

impl ApiResponse<Value> {
    /// Error envelope with the given code
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Map a service error onto the envelope and an HTTP status.
pub fn error_response(err: &PlatformError) -> HttpResponse {
    match err {
        PlatformError::NotFound(message) => {
            HttpResponse::NotFound().json(ApiResponse::failure(404, message.clone()))
        }
        PlatformError::Validation(message) => {
            HttpResponse::BadRequest().json(ApiResponse::failure(-1, message.clone()))
        }
        other => {
            error!("Request failed: {}", other);
            HttpResponse::InternalServerError()
                .json(ApiResponse::failure(-1, other.to_string()))
        }
    }
}
