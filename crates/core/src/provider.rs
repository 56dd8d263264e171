//! Provider traits — the abstraction over text-generation back-ends.
//!
//! Two call shapes exist and they are deliberately kept apart:
//!
//! - [`ChatProvider`]: role-tagged messages plus temperature and an output
//!   ceiling (OpenAI-style chat completions).
//! - [`TextGenerationProvider`]: one pre-rendered prompt string plus a
//!   new-token ceiling (Hugging Face style text generation).
//!
//! The dispatcher owns the translation from its internal prompt into each
//! shape; providers only speak their own wire format.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to use (e.g., "llama-3.3-70b-versatile")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.3
}

/// A complete chat-completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated text
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A single-string text-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextGenerationRequest {
    /// The model to use (e.g., "Qwen/Qwen2.5-72B-Instruct")
    pub model: String,

    /// Fully rendered prompt, turn markers included
    pub prompt: String,

    /// Maximum new tokens to generate
    pub max_new_tokens: u32,
}

/// A back-end that accepts role-tagged chat messages.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// A back-end that accepts one concatenated prompt string.
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "huggingface").
    fn name(&self) -> &str;

    /// Generate a continuation of `request.prompt`.
    async fn generate(&self, request: TextGenerationRequest) -> Result<String, ProviderError>;
}
