//! OpenAI-Compatible API Provider
//!
//! Completion provider for OpenAI's Chat Completions API and compatible
//! endpoints (OpenRouter etc. via `api_base`). Requests JSON-object output
//! mode so the model is asked to emit JSON only; whatever comes back is
//! still treated as untrusted text by the normalizer.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{Completion, LlmProvider, ProviderConfig, TokenUsage};
use crate::types::{Result, VetError};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI API provider with secure API key handling.
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                VetError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VetError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, system: &str, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<Completion> {
        info!(
            "Requesting completion (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(system, prompt);
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| VetError::LlmApi(format!("Completion request failed: {}", e)))?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VetError::LlmApi(format!(
                "Completion API error ({}): {}",
                status, body
            )));
        }

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| VetError::LlmApi(format!("Failed to parse completion envelope: {}", e)))?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        let text = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| VetError::LlmApi("Empty completion response".to_string()))?;

        debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            tokens = usage.total(),
            "Completion received"
        );

        Ok(Completion {
            text,
            usage,
            elapsed,
            model: self.model.clone(),
            provider: "openai".to_string(),
        })
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_config_error() {
        // Guard against a key leaking in from the environment.
        if std::env::var("OPENAI_API_KEY").is_ok() {
            return;
        }
        let err = OpenAiProvider::new(ProviderConfig::default()).unwrap_err();
        assert!(matches!(err, VetError::Config(_)));
    }

    #[test]
    fn test_request_shape() {
        let provider = OpenAiProvider::new(ProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        })
        .unwrap();

        let request = provider.build_request("be terse", "audit this");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].content, "audit this");
        assert_eq!(
            request.response_format.as_ref().unwrap().format_type,
            "json_object"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = OpenAiProvider::new(ProviderConfig {
            api_key: Some("sk-test-123".to_string()),
            ..Default::default()
        })
        .unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-test-123"));
    }
}
