//! Answer generation: prompting the model chunk by chunk and picking the answer

pub mod generator;
pub mod ollama;
pub mod prompt;
pub mod selector;

pub use generator::AnswerGenerator;
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
pub use selector::select_answer;
