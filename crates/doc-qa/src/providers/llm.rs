//! LLM provider trait for per-chunk generation

use async_trait::async_trait;

use crate::config::GenerationConfig;
use crate::error::Result;

/// Per-call generation limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,
    /// Allow the model to truncate prompts longer than its context window
    pub truncate: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for GenerationOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_new_tokens: config.max_new_tokens,
            truncate: config.truncate,
        }
    }
}

/// Trait for text generation
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (phi3, llama3.2, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
