//! Chat-completion client for the upstream AI provider.
//!
//! One request per call: a fixed system instruction, the caller's prompt as
//! the user turn, a fixed temperature and the given token budget. No retries,
//! no streaming, no timeout beyond the transport default.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::generation::TextGenerator;

/// System instruction sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful creative assistant.";

/// Sampling temperature used for every request.
pub const TEMPERATURE: f64 = 0.8;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,

    #[error("OpenAI API error {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("OpenAI request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// ─── Wire Types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Outbound chat-completion request body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// The parts of the provider response we read. Every level is optional so a
/// well-formed but empty response yields empty text instead of an error.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, or an empty string.
    pub fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

// ─── Client ────────────────────────────────────────────────────────────────

/// Production [`TextGenerator`] talking to an OpenAI-compatible API.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: Arc<UpstreamConfig>,
}

impl OpenAiClient {
    /// Create a client with a fresh connection pool.
    pub fn new(config: UpstreamConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: UpstreamConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    fn build_request<'a>(&'a self, prompt: &str, max_tokens: u32) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let body = self.build_request(prompt, max_tokens);

        debug!(
            model = body.model,
            max_tokens,
            prompt_chars = prompt.len(),
            "Sending chat completion request"
        );

        let resp = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream { status, body });
        }

        let parsed: ChatCompletionResponse = resp.json().await?;
        Ok(parsed.into_text())
    }
}
