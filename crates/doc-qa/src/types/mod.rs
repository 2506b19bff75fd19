//! Core types for document question answering

pub mod answer;
pub mod document;
pub mod response;

pub use answer::{ChunkAnswer, ChunkOutcome, FinalAnswer, FALLBACK_ANSWER};
pub use document::{Chunk, DocumentKind, ExtractedText, SUPPORTED_EXTENSIONS};
pub use response::{AskResponse, DocumentSummary};
