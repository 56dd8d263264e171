//! Generation dispatch — primary chat back-end with a text-generation fallback.
//!
//! A linear two-stage machine, one attempt per stage:
//!
//! 1. **Primary**: role-tagged chat completion. Success returns immediately;
//!    any failure (error, malformed response, timeout) is logged and falls
//!    through.
//! 2. **Secondary**: one turn-delimited prompt string. Success returns the
//!    text; failure returns a diagnostic string naming the error.
//!
//! With no stage available the fixed offline message is returned.
//! [`Dispatcher::generate`] never errors: the caller is a person reading text.

use examiner_config::{PrimaryProviderConfig, ProvidersConfig, SecondaryProviderConfig};
use examiner_core::error::ProviderError;
use examiner_core::message::{Message, Prompt};
use examiner_core::provider::{
    ChatProvider, ChatRequest, TextGenerationProvider, TextGenerationRequest,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::hf_inference::HfInferenceProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Returned when neither back-end can be tried.
pub const OFFLINE_MESSAGE: &str = "Intelligence engines offline. Please check API keys.";

/// Prefix of the answer returned when the last back-end fails.
const ALL_ENGINES_FAILED: &str = "Error with all intelligence engines";

/// The chat-completion stage and its fixed call parameters.
pub struct PrimaryStage {
    provider: Arc<dyn ChatProvider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl PrimaryStage {
    pub fn new(provider: Arc<dyn ChatProvider>, config: &PrimaryProviderConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Override the stage deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Role-tagged translation of the prompt.
    fn request(&self, prompt: &Prompt) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(prompt.system.clone()),
                Message::user(prompt.user.clone()),
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        }
    }

    async fn run(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let name = self.provider.name();
        match tokio::time::timeout(self.timeout, self.provider.complete(self.request(prompt))).await
        {
            Ok(result) => result.map(|response| response.content),
            Err(_) => Err(ProviderError::Timeout(format!(
                "Provider '{}' timed out after {}s",
                name,
                self.timeout.as_secs()
            ))),
        }
    }
}

/// The text-generation stage and its fixed call parameters.
pub struct SecondaryStage {
    provider: Arc<dyn TextGenerationProvider>,
    model: String,
    max_new_tokens: u32,
    timeout: Duration,
}

impl SecondaryStage {
    pub fn new(provider: Arc<dyn TextGenerationProvider>, config: &SecondaryProviderConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_new_tokens: config.max_new_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Override the stage deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Single-string translation of the prompt.
    fn request(&self, prompt: &Prompt) -> TextGenerationRequest {
        TextGenerationRequest {
            model: self.model.clone(),
            prompt: render_turn_template(prompt),
            max_new_tokens: self.max_new_tokens,
        }
    }

    async fn run(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let name = self.provider.name();
        match tokio::time::timeout(self.timeout, self.provider.generate(self.request(prompt))).await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "Provider '{}' timed out after {}s",
                name,
                self.timeout.as_secs()
            ))),
        }
    }
}

/// Render the prompt with chat-template turn markers.
pub fn render_turn_template(prompt: &Prompt) -> String {
    format!(
        "<|system|>\n{}\n<|user|>\n{}\n<|assistant|>",
        prompt.system, prompt.user
    )
}

/// Sends prompts to the primary back-end, falling back to the secondary.
pub struct Dispatcher {
    primary: Option<PrimaryStage>,
    secondary: Option<SecondaryStage>,
}

impl Dispatcher {
    /// Build from explicit stages. `None` means that stage is unconfigured.
    pub fn new(primary: Option<PrimaryStage>, secondary: Option<SecondaryStage>) -> Self {
        Self { primary, secondary }
    }

    /// Build real HTTP clients for whichever providers have API keys.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let primary = match &config.primary.api_key {
            Some(key) if config.primary_configured() => {
                let provider = OpenAiCompatProvider::new(
                    "groq",
                    &config.primary.api_url,
                    key,
                    Duration::from_secs(config.primary.timeout_secs),
                )?;
                Some(PrimaryStage::new(Arc::new(provider), &config.primary))
            }
            _ => None,
        };

        let secondary = match &config.secondary.api_key {
            Some(key) if config.secondary_configured() => {
                let provider = HfInferenceProvider::new(
                    &config.secondary.api_url,
                    key,
                    Duration::from_secs(config.secondary.timeout_secs),
                )?;
                Some(SecondaryStage::new(Arc::new(provider), &config.secondary))
            }
            _ => None,
        };

        info!(
            primary = primary.is_some(),
            secondary = secondary.is_some(),
            "Generation dispatcher configured"
        );

        Ok(Self::new(primary, secondary))
    }

    pub fn primary_configured(&self) -> bool {
        self.primary.is_some()
    }

    pub fn secondary_configured(&self) -> bool {
        self.secondary.is_some()
    }

    /// Generate an answer. Always returns text, never an error.
    pub async fn generate(&self, prompt: &Prompt) -> String {
        if let Some(primary) = &self.primary {
            match primary.run(prompt).await {
                Ok(text) => return text,
                Err(e) => warn!(
                    provider = %primary.provider.name(),
                    error = %e,
                    "Primary engine failed, falling back to secondary"
                ),
            }
        }

        if let Some(secondary) = &self.secondary {
            return match secondary.run(prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        provider = %secondary.provider.name(),
                        error = %e,
                        "Secondary engine failed"
                    );
                    format!("{ALL_ENGINES_FAILED}: {e}")
                }
            };
        }

        OFFLINE_MESSAGE.to_string()
    }
}
