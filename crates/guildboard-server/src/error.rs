//! Error types for the REST query surface.
//!
//! [`ApiError`] unifies the handlers' failure modes into a single enum
//! with an [`IntoResponse`](axum::response::IntoResponse) implementation.
//! The realtime gateway does not use this type: its failures are contained
//! per message and never become HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A serialization error while building a response body.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
