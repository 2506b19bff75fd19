//! Ollama API client for text generation

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::GenerationOptions;

/// Rough characters-per-token ratio used to size prompts
const CHARS_PER_TOKEN: usize = 4;

/// Ollama API client
///
/// Requests are sent once. A failed request is reported to the caller, which
/// decides whether to move on.
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    /// Maximum tokens to generate
    num_predict: u32,
    /// Context window; longer prompts are truncated by the server
    num_ctx: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Estimated prompt size in tokens
    fn estimate_tokens(prompt: &str) -> usize {
        prompt.chars().count().div_ceil(CHARS_PER_TOKEN)
    }

    /// Reject prompts over the context window unless truncation is allowed
    fn check_context(&self, prompt: &str, options: &GenerationOptions) -> Result<()> {
        if options.truncate {
            return Ok(());
        }
        let estimated = Self::estimate_tokens(prompt);
        if estimated > self.config.context_size {
            return Err(Error::llm(format!(
                "Prompt of ~{} tokens exceeds context window of {} and truncation is disabled",
                estimated, self.config.context_size
            )));
        }
        Ok(())
    }

    fn build_request<'a>(&'a self, prompt: &'a str, options: &GenerationOptions) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: options.max_new_tokens,
                num_ctx: self.config.context_size,
            },
        }
    }

    /// Generate a completion for the prompt
    pub async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        self.check_context(prompt, options)?;

        let url = format!("{}/api/generate", self.config.base_url);
        let request = self.build_request(prompt, options);

        tracing::debug!(
            "Generating with model {} (max {} tokens)",
            self.config.model,
            options.max_new_tokens
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Generation failed: HTTP {} - {}",
                status, body
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse generation response: {}", e)))?;

        Ok(generate_response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(context_size: usize) -> OllamaClient {
        OllamaClient::new(&LlmConfig {
            // Discard port, nothing listens there
            base_url: "http://127.0.0.1:9".to_string(),
            context_size,
            timeout_secs: 5,
            ..LlmConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_maps_options() {
        let client = client(2048);
        let options = GenerationOptions {
            max_new_tokens: 200,
            truncate: true,
        };
        let json = serde_json::to_value(client.build_request("prompt", &options)).unwrap();

        assert_eq!(json["model"], "phi3");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 200);
        assert_eq!(json["options"]["num_ctx"], 2048);
    }

    #[test]
    fn test_context_check_only_without_truncation() {
        let client = client(10);
        let long_prompt = "x".repeat(41);

        let truncating = GenerationOptions { max_new_tokens: 5, truncate: true };
        assert!(client.check_context(&long_prompt, &truncating).is_ok());

        let strict = GenerationOptions { max_new_tokens: 5, truncate: false };
        assert!(matches!(client.check_context(&long_prompt, &strict), Err(Error::Llm(_))));
        assert!(client.check_context(&"x".repeat(40), &strict).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = client(4096);
        assert!(!client.health_check().await.unwrap());

        let err = client
            .generate("prompt", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }
}
