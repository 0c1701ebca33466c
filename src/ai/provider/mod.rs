//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait for completion generation. Providers
//! return the raw completion text plus token usage metrics; parsing and
//! normalizing that text is the caller's concern (`ai::normalize`).
//!
//! Providers never retry: retry/backoff for the network call belongs to
//! whoever drives the pipeline, not here.

mod openai;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::types::{Result, VetError};

// =============================================================================
// Completion Response
// =============================================================================

/// Raw completion with usage metrics.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Completion text exactly as returned by the provider.
    pub text: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Wall-clock time for the request
    pub elapsed: Duration,
    /// Model that produced the completion
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Token usage metrics for cost tracking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Shared provider handle for injection into the pipeline.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers.
///
/// The API key is never serialized to output and is redacted in debug
/// output; the provider converts it to `SecretString` for runtime use.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider type; currently "openai" (any OpenAI-compatible endpoint)
    pub provider: String,
    /// Model name (provider-specific)
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,
    /// API key; falls back to OPENAI_API_KEY at construction
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL, for OpenRouter or other compatible endpoints
    pub api_base: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 120,
            temperature: 0.0,
            api_key: None,
            api_base: None,
            max_tokens: 8192,
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Completion provider for a hosted language model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one completion with a system instruction and a user prompt,
    /// requesting JSON-only output where the provider supports it.
    async fn complete(&self, system: &str, prompt: &str) -> Result<Completion>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        other => Err(VetError::Config(format!(
            "Unknown provider: {}. Supported: openai",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_debug_redacts_key() {
        let config = ProviderConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = ProviderConfig {
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        assert!(create_provider(&config).is_err());
    }
}
