//! Model invocation boundary
//!
//! The pipeline only sees [`LlmProvider`]; the shipped implementation talks to a
//! local Ollama server.

pub mod llm;
pub mod ollama;

pub use llm::{GenerationOptions, LlmProvider};
pub use ollama::OllamaLlm;
