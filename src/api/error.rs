//! HTTP rendering of domain errors.
//!
//! Bodies follow a `{"detail": ...}` shape, except field validation errors
//! which are returned as `{"field": ["message", ...]}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::permissions::PERMISSION_DENIED;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        match self {
            DomainError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            DomainError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": msg }))).into_response()
            }
            DomainError::InvalidFields(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            DomainError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "detail": msg }))).into_response()
            }
            DomainError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": PERMISSION_DENIED })),
            )
                .into_response(),
            DomainError::Database(msg) | DomainError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
