//! Per-chunk and final answer types

use serde::{Deserialize, Serialize};

/// Returned when no chunk produced a usable answer
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't generate an answer from the document.";

/// What happened when one chunk was put to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum ChunkOutcome {
    /// Model returned text, possibly empty
    Generated(String),
    /// Invocation failed
    Failed(String),
}

/// Model result for a single chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkAnswer {
    /// Index of the chunk that was asked
    pub chunk_index: usize,
    /// Outcome of the invocation
    pub outcome: ChunkOutcome,
}

impl ChunkAnswer {
    /// Successful generation
    pub fn generated(chunk_index: usize, text: impl Into<String>) -> Self {
        Self {
            chunk_index,
            outcome: ChunkOutcome::Generated(text.into()),
        }
    }

    /// Failed generation
    pub fn failed(chunk_index: usize, reason: impl Into<String>) -> Self {
        Self {
            chunk_index,
            outcome: ChunkOutcome::Failed(reason.into()),
        }
    }

    /// Trimmed answer text, if generation succeeded with non-blank output
    pub fn answer_text(&self) -> Option<&str> {
        match &self.outcome {
            ChunkOutcome::Generated(text) => Some(text.trim()).filter(|t| !t.is_empty()),
            ChunkOutcome::Failed(_) => None,
        }
    }

    /// True if the invocation failed
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Failed(_))
    }
}

/// The answer handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAnswer {
    /// Answer text, trimmed, or the fallback message
    pub text: String,
    /// Chunk that produced the answer, `None` for the fallback
    pub chunk_index: Option<usize>,
}

impl FinalAnswer {
    /// Answer taken from a chunk
    pub fn from_chunk(chunk_index: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chunk_index: Some(chunk_index),
        }
    }

    /// The fixed fallback answer
    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_ANSWER.to_string(),
            chunk_index: None,
        }
    }

    /// True when no chunk answered
    pub fn is_fallback(&self) -> bool {
        self.chunk_index.is_none()
    }
}
