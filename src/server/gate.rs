//! Request gate applied to every application route.
//!
//! Runs in this order: origin check, CORS headers (which also answer
//! preflight requests), then the shared-secret check.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::OriginPolicy;
use crate::server::error::ApiError;
use crate::server::routes::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject browser requests whose `Origin` is not allowed. Requests without
/// an `Origin` header always pass.
pub async fn require_allowed_origin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.config.origins.allows(o))
            .unwrap_or(false);

        if !allowed {
            warn!(origin = ?origin, path = %req.uri().path(), "Origin not allowed");
            return Err(ApiError::OriginRejected);
        }
    }

    Ok(next.run(req).await)
}

/// Require `x-api-key` to match the configured secret, if there is one.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.client_api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req.headers().get(API_KEY_HEADER).map(HeaderValue::as_bytes);
    if provided != Some(expected.as_bytes()) {
        warn!(
            path = %req.uri().path(),
            present = provided.is_some(),
            "Rejected request with missing or invalid API key"
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

/// CORS response headers for the resolved origin policy.
pub fn cors_layer(policy: &OriginPolicy) -> CorsLayer {
    let allow_origin = match policy {
        OriginPolicy::Any => AllowOrigin::any(),
        OriginPolicy::List(origins) => AllowOrigin::list(origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(origin = %origin, "Ignoring unusable origin in ALLOWED_ORIGINS"))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
}
