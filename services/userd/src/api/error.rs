//! API error construction.
//!
//! Keeps the error shape uniform across endpoints: a status code plus the
//! JSON [`ErrorResponse`] body. Internal errors log detail server-side and
//! return a generic message.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use roster_common::validate::FieldError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            errors: Vec::new(),
        },
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn api_conflict(message: &str) -> ApiError {
    api_error(StatusCode::CONFLICT, "conflict", message)
}

/// 400 carrying the per-field validation detail.
pub fn api_validation_error(errors: Vec<FieldError>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "validation_error".to_string(),
            message: format!("draft failed validation ({} field(s))", errors.len()),
            errors,
        },
    }
}

pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "userd storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Map a store failure onto the matching HTTP error.
pub fn from_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => api_not_found(&what),
        StoreError::Conflict(what) => api_conflict(&what),
        err @ StoreError::Unexpected(_) => api_internal("storage failure", &err),
    }
}
