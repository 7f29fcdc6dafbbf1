//! Creator-tools HTTP API.
//!
//! Implements:
//! - POST /generate-title
//! - POST /generate-name
//! - POST /generate-bio
//! - POST /calc-subs
//! - POST /calc-ads
//! - GET /health

use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::calculators::{AdsInput, AdsResult, SubsInput, SubsResult};
use crate::config::Config;
use crate::generation::prompts::{bio_prompt, name_prompt, title_prompt};
use crate::generation::{parse_lines, TextGenerator};
use crate::server::error::ApiError;
use crate::server::extract::JsonBody;
use crate::server::gate::{cors_layer, require_allowed_origin, require_api_key};

/// Token budget and list cap per generation endpoint.
const TITLE_MAX_TOKENS: u32 = 300;
const TITLE_LIMIT: usize = 10;
const NAME_MAX_TOKENS: u32 = 300;
const NAME_LIMIT: usize = 15;
const BIO_MAX_TOKENS: u32 = 500;
const BIO_LIMIT: usize = 5;

/// Application state shared across handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn TextGenerator>,
}

/// Build the axum router with all API routes.
///
/// `/health` sits outside the origin and API-key gate so it can be used as a
/// liveness probe.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/generate-title", post(generate_title))
        .route("/generate-name", post(generate_name))
        .route("/generate-bio", post(generate_bio))
        .route("/calc-subs", post(calc_subs))
        .route("/calc-ads", post(calc_ads))
        // Outermost first: origin check, CORS, then the API key.
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_allowed_origin,
                ))
                .layer(cors_layer(&state.config.origins))
                .layer(middleware::from_fn_with_state(state.clone(), require_api_key)),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
}

// ─── Request/Response Types ────────────────────────────────────────────────

/// A prompt field coerced to text.
///
/// Strings pass through; numbers and booleans are printed; arrays are joined
/// with commas; objects are rendered as compact JSON. Nothing is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(pub String);

impl Text {
    fn render(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) => items.iter().map(Self::render).collect::<Vec<_>>().join(","),
            Value::Object(_) => value.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self(Self::render(&value)))
    }
}

/// Absent and `null` fields take the default; anything supplied is kept.
fn field_or<'a>(value: &'a Option<Text>, default: &'a str) -> &'a str {
    value.as_ref().map_or(default, |text| text.0.as_str())
}

/// Body of `POST /generate-title`.
#[derive(Debug, Default, Deserialize)]
pub struct TitleRequest {
    #[serde(default)]
    pub game: Option<Text>,
    #[serde(default)]
    pub keywords: Option<Text>,
    #[serde(default)]
    pub voice: Option<Text>,
}

impl TitleRequest {
    pub fn prompt(&self) -> String {
        title_prompt(
            field_or(&self.game, ""),
            field_or(&self.keywords, ""),
            field_or(&self.voice, "friendly"),
        )
    }
}

/// Body of `POST /generate-name`.
#[derive(Debug, Default, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub keywords: Option<Text>,
    #[serde(default)]
    pub style: Option<Text>,
}

impl NameRequest {
    pub fn prompt(&self) -> String {
        name_prompt(field_or(&self.keywords, ""), field_or(&self.style, "short"))
    }
}

/// Body of `POST /generate-bio`.
#[derive(Debug, Default, Deserialize)]
pub struct BioRequest {
    #[serde(default)]
    pub vibe: Option<Text>,
    #[serde(default)]
    pub length: Option<Text>,
}

impl BioRequest {
    pub fn prompt(&self) -> String {
        bio_prompt(field_or(&self.vibe, "friendly"), field_or(&self.length, "short"))
    }
}

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct NamesResponse {
    pub names: Vec<String>,
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct BiosResponse {
    pub bios: Vec<String>,
    pub raw: String,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

/// Run one prompt through the generator and split the result into lines.
async fn generate_list(
    state: &AppState,
    endpoint: &'static str,
    prompt: String,
    max_tokens: u32,
    limit: usize,
) -> Result<(Vec<String>, String), ApiError> {
    let request_id = Uuid::new_v4().to_string();

    info!(request_id, endpoint, max_tokens, "Generation request");

    let raw = state
        .generator
        .generate(&prompt, max_tokens)
        .await
        .inspect_err(|e| error!(request_id, endpoint, error = %e, "Generation failed"))?;

    let items = parse_lines(&raw, limit);

    info!(
        request_id,
        endpoint,
        items = items.len(),
        raw_chars = raw.len(),
        "Generation complete"
    );

    Ok((items, raw))
}

async fn generate_title(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<TitleRequest>,
) -> Result<Json<TitlesResponse>, ApiError> {
    let (titles, raw) = generate_list(
        &state,
        "generate-title",
        req.prompt(),
        TITLE_MAX_TOKENS,
        TITLE_LIMIT,
    )
    .await?;
    Ok(Json(TitlesResponse { titles, raw }))
}

async fn generate_name(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NameRequest>,
) -> Result<Json<NamesResponse>, ApiError> {
    let (names, raw) = generate_list(
        &state,
        "generate-name",
        req.prompt(),
        NAME_MAX_TOKENS,
        NAME_LIMIT,
    )
    .await?;
    Ok(Json(NamesResponse { names, raw }))
}

async fn generate_bio(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<BioRequest>,
) -> Result<Json<BiosResponse>, ApiError> {
    let (bios, raw) = generate_list(
        &state,
        "generate-bio",
        req.prompt(),
        BIO_MAX_TOKENS,
        BIO_LIMIT,
    )
    .await?;
    Ok(Json(BiosResponse { bios, raw }))
}

async fn calc_subs(JsonBody(input): JsonBody<SubsInput>) -> Json<SubsResult> {
    Json(input.calculate())
}

async fn calc_ads(JsonBody(input): JsonBody<AdsInput>) -> Json<AdsResult> {
    Json(input.calculate())
}

async fn health() -> &'static str {
    "OK"
}
