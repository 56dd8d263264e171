//! Hugging Face inference provider.
//!
//! Speaks the single-string text-generation shape: `POST {base}/{model}`
//! with `{"inputs": prompt, "parameters": {...}}`. Used as the secondary
//! back-end.

use async_trait::async_trait;
use examiner_core::error::ProviderError;
use examiner_core::provider::{TextGenerationProvider, TextGenerationRequest};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HfInferenceProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HfInferenceProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model.trim_start_matches('/'))
    }
}

#[async_trait]
impl TextGenerationProvider for HfInferenceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, request: TextGenerationRequest) -> Result<String, ProviderError> {
        let url = self.model_url(&request.model);

        let body = serde_json::json!({
            "inputs": request.prompt,
            "parameters": {
                "max_new_tokens": request.max_new_tokens,
                "return_full_text": false,
            },
        });

        debug!(model = %request.model, "Sending text-generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid Hugging Face token".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Text-generation endpoint returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let payload: GenerationPayload = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        payload.into_text()
    }
}

/// The endpoint answers with a list, a single object, or an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationPayload {
    Batch(Vec<Generated>),
    Single(Generated),
    Failure { error: String },
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

impl GenerationPayload {
    fn into_text(self) -> Result<String, ProviderError> {
        match self {
            Self::Batch(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| ProviderError::InvalidResponse("Empty generation list".into())),
            Self::Single(g) => Ok(g.generated_text),
            Self::Failure { error } => Err(ProviderError::ApiError {
                status_code: 200,
                message: error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> HfInferenceProvider {
        HfInferenceProvider::new(
            "https://router.huggingface.co/hf-inference/models/",
            "hf-test",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn model_id_becomes_path() {
        assert_eq!(
            provider().model_url("Qwen/Qwen2.5-72B-Instruct"),
            "https://router.huggingface.co/hf-inference/models/Qwen/Qwen2.5-72B-Instruct"
        );
    }

    #[test]
    fn batch_payload_takes_first_generation() {
        let payload: GenerationPayload =
            serde_json::from_str(r#"[{"generated_text": "first"}, {"generated_text": "second"}]"#).unwrap();
        assert_eq!(payload.into_text().unwrap(), "first");
    }

    #[test]
    fn single_payload_accepted() {
        let payload: GenerationPayload = serde_json::from_str(r#"{"generated_text": "only"}"#).unwrap();
        assert_eq!(payload.into_text().unwrap(), "only");
    }

    #[test]
    fn error_payload_becomes_api_error() {
        let payload: GenerationPayload =
            serde_json::from_str(r#"{"error": "Model is currently loading"}"#).unwrap();
        match payload.into_text() {
            Err(ProviderError::ApiError { message, .. }) => assert!(message.contains("loading")),
            other => panic!("Expected ApiError, got: {other:?}"),
        }
    }

    #[test]
    fn empty_batch_is_invalid() {
        let payload: GenerationPayload = serde_json::from_str("[]").unwrap();
        assert!(payload.into_text().is_err());
    }
}
