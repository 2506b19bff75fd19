//! Response types for the web UI

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answer::{ChunkAnswer, FinalAnswer};
use super::document::{DocumentKind, ExtractedText};

/// Summary of the document a question was asked about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Filename
    pub filename: String,
    /// Detected kind
    pub kind: DocumentKind,
    /// Number of pages (PDF only)
    pub total_pages: Option<u32>,
    /// Extracted text length in characters
    pub char_count: usize,
}

impl From<&ExtractedText> for DocumentSummary {
    fn from(text: &ExtractedText) -> Self {
        Self {
            filename: text.filename.clone(),
            kind: text.kind,
            total_pages: text.total_pages,
            char_count: text.char_count(),
        }
    }
}

/// Response from `POST /api/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Request ID, also present in the server log
    pub request_id: Uuid,
    /// Question as submitted
    pub question: String,
    /// Final answer text
    pub answer: String,
    /// True when no chunk answered and the fallback text was returned
    pub is_fallback: bool,
    /// Chunk the answer came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_by_chunk: Option<usize>,
    /// Number of chunks the document was split into
    pub chunks_total: usize,
    /// Number of chunks the model was asked about
    pub chunks_queried: usize,
    /// Number of chunks whose invocation failed
    pub chunks_failed: usize,
    /// Document metadata
    pub document: DocumentSummary,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl AskResponse {
    /// Build a response from a finished pipeline run
    pub fn new(
        request_id: Uuid,
        question: String,
        document: DocumentSummary,
        chunks_total: usize,
        answers: &[ChunkAnswer],
        answer: FinalAnswer,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            request_id,
            question,
            is_fallback: answer.is_fallback(),
            answered_by_chunk: answer.chunk_index,
            answer: answer.text,
            chunks_total,
            chunks_queried: answers.len(),
            chunks_failed: answers.iter().filter(|a| a.is_failure()).count(),
            document,
            processing_time_ms,
        }
    }
}
