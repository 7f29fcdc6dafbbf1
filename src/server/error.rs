//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::generation::GenerationError;

/// Body text for a missing or mismatched shared secret.
pub const UNAUTHORIZED_MESSAGE: &str = "Missing or invalid x-api-key header";

/// Body text for a request from a disallowed origin.
pub const CORS_REJECTED_MESSAGE: &str = "Not allowed by CORS";

/// Everything a handler or gate can fail with.
///
/// All variants except [`ApiError::OriginRejected`] render as
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not allowed by CORS")]
    OriginRejected,

    #[error("Missing or invalid x-api-key header")]
    Unauthorized,

    #[error("Invalid JSON body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::OriginRejected => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::OriginRejected => (status, CORS_REJECTED_MESSAGE).into_response(),
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
