//! Creative-text generation.
//!
//! - [`client`]: Chat-completion client for the upstream provider
//! - [`parser`]: Splits generated text into a capped list of lines
//! - [`prompts`]: Prompt templates per endpoint

pub mod client;
pub mod parser;
pub mod prompts;

use async_trait::async_trait;

pub use client::{GenerationError, OpenAiClient};
pub use parser::parse_lines;

/// Anything that can turn a prompt into generated text.
///
/// The HTTP layer only depends on this trait, so handlers can run against
/// an in-process fake in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`, spending at most `max_tokens`.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError>;
}
