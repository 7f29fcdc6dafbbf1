//! HTTP server for the creator-tools API.
//!
//! - [`routes`]: Request/response types, route handlers and router assembly
//! - [`gate`]: Origin policy, CORS headers and shared-secret check
//! - [`extract`]: Lenient JSON body extractor
//! - [`error`]: Error type rendered as JSON responses

pub mod error;
pub mod extract;
pub mod gate;
pub mod routes;

pub use routes::{build_router, AppState};
