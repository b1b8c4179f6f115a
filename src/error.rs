//! Error types for the API
//!
//! Provides unified error handling using thiserror.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

// == Api Error Enum ==
/// Unified error type for the backend.
///
/// `NotFound` covers both genuinely absent rows and rows owned by another
/// user: the two cases must be indistinguishable to the caller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input, with per-field messages
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Missing or invalid credentials
    #[error("Authentication required")]
    AuthenticationRequired,

    /// No visible matching row
    #[error("Not found")]
    NotFound,

    /// External HTTP dependency failed or timed out
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Convenience constructor for a single-field validation error.
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        ApiError::Validation(errors)
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Authentication credentials were not provided." })),
            )
                .into_response(),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            ApiError::UpstreamUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the backend.
pub type Result<T> = std::result::Result<T, ApiError>;
