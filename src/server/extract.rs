//! Lenient JSON body extraction.
//!
//! An empty body deserializes as the type's default, and a non-empty body is
//! parsed as JSON whatever its `Content-Type`. Non-object JSON values
//! carry no fields and also yield the default. Malformed JSON is a 400.

use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::server::error::ApiError;

/// Request body extractor with per-field defaults.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(e.to_string()))?;

        // Only objects carry fields; any other JSON value means "no fields".
        if !value.is_object() {
            return Ok(Self(T::default()));
        }

        serde_json::from_value(value)
            .map(Self)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}
