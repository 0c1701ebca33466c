//! AI Integration Layer
//!
//! Prompt construction, completion providers, and response normalization.

pub mod normalize;
pub mod prompt;
pub mod provider;

pub use normalize::{normalize_response, normalize_value};
pub use prompt::{PromptBuilder, build_audit_prompt, entry_point_hints, system_instruction};
pub use provider::{
    Completion, LlmProvider, OpenAiProvider, ProviderConfig, SharedProvider, TokenUsage,
    create_provider,
};
