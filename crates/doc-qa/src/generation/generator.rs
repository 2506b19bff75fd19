//! Asking the question against each chunk in turn

use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::providers::{GenerationOptions, LlmProvider};
use crate::types::{Chunk, ChunkAnswer};

use super::prompt::PromptBuilder;

/// Sequential per-chunk answer generator
pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
    options: GenerationOptions,
    stop_at_first_answer: bool,
}

impl AnswerGenerator {
    /// Create a generator around an injected provider
    pub fn new(llm: Arc<dyn LlmProvider>, config: &GenerationConfig) -> Self {
        Self {
            llm,
            options: GenerationOptions::from(config),
            stop_at_first_answer: config.stop_at_first_answer,
        }
    }

    /// The provider used for generation
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Generation limits sent with every call
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Put the question to every chunk, one call at a time, in chunk order.
    ///
    /// A failed call is recorded as [`ChunkOutcome::Failed`](crate::types::ChunkOutcome)
    /// and the loop moves on; it is never retried.
    pub async fn answer_chunks(&self, question: &str, chunks: &[Chunk]) -> Vec<ChunkAnswer> {
        let mut answers = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let prompt = PromptBuilder::build_chunk_prompt(&chunk.content, question);

            let answer = match self.llm.generate(&prompt, &self.options).await {
                Ok(text) => {
                    tracing::debug!("Chunk {} answered ({} chars)", chunk.index, text.len());
                    ChunkAnswer::generated(chunk.index, text)
                }
                Err(e) => {
                    tracing::warn!("Generation failed for chunk {}: {}", chunk.index, e);
                    ChunkAnswer::failed(chunk.index, e.to_string())
                }
            };

            let answered = answer.answer_text().is_some();
            answers.push(answer);

            if answered && self.stop_at_first_answer {
                tracing::debug!("Stopping after chunk {} of {}", chunk.index + 1, chunks.len());
                break;
            }
        }

        answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::llm::MockLlmProvider;
    use crate::types::ChunkOutcome;
    use mockall::Sequence;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i, *t, 0))
            .collect()
    }

    #[tokio::test]
    async fn test_one_call_per_chunk_in_order() {
        let mut llm = MockLlmProvider::new();
        let mut seq = Sequence::new();
        for (context, reply) in [("first", ""), ("second", "B"), ("third", "C")] {
            llm.expect_generate()
                .withf(move |prompt, options| {
                    prompt.contains(&format!("context:\n{}\n", context))
                        && prompt.contains("Question: Which?")
                        && options.max_new_tokens == 200
                        && options.truncate
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _| Ok(reply.to_string()));
        }

        let generator = AnswerGenerator::new(Arc::new(llm), &GenerationConfig::default());
        let answers = generator
            .answer_chunks("Which?", &chunks(&["first", "second", "third"]))
            .await;

        assert_eq!(
            answers,
            vec![
                ChunkAnswer::generated(0, ""),
                ChunkAnswer::generated(1, "B"),
                ChunkAnswer::generated(2, "C"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_loop_continues() {
        let mut llm = MockLlmProvider::new();
        let mut seq = Sequence::new();
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::llm("model crashed")));
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("recovered".to_string()));

        let generator = AnswerGenerator::new(Arc::new(llm), &GenerationConfig::default());
        let answers = generator.answer_chunks("q", &chunks(&["a", "b"])).await;

        assert_eq!(answers.len(), 2);
        assert!(matches!(&answers[0].outcome, ChunkOutcome::Failed(reason) if reason.contains("model crashed")));
        assert_eq!(answers[1], ChunkAnswer::generated(1, "recovered"));
    }

    #[tokio::test]
    async fn test_no_chunks_no_calls() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate().never();

        let generator = AnswerGenerator::new(Arc::new(llm), &GenerationConfig::default());
        assert!(generator.answer_chunks("q", &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_stop_at_first_answer() {
        let mut llm = MockLlmProvider::new();
        let mut seq = Sequence::new();
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(" ".to_string()));
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("found".to_string()));

        let config = GenerationConfig {
            stop_at_first_answer: true,
            ..GenerationConfig::default()
        };
        let generator = AnswerGenerator::new(Arc::new(llm), &config);
        let answers = generator.answer_chunks("q", &chunks(&["a", "b", "c", "d"])).await;

        assert_eq!(answers.len(), 2);
        assert_eq!(answers[1].answer_text(), Some("found"));
    }
}
