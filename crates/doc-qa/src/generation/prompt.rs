//! Prompt template for per-chunk questions

/// Prompt builder for chunk questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the prompt asking `question` against one chunk of context.
    /// Both are embedded verbatim.
    pub fn build_chunk_prompt(chunk: &str, question: &str) -> String {
        format!(
            "Answer the question based on the following context:\n{context}\n\nQuestion: {question}\nAnswer:",
            context = chunk,
            question = question
        )
    }
}
