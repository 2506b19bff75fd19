//! doc-qa: question answering over a single PDF, Markdown or HTML document
//!
//! The document text is extracted, split into fixed-size chunks, and every chunk is
//! put to a generative LLM together with the question. The first non-empty answer
//! wins. Both the `doc-qa` CLI and the `doc-qa-server` web UI drive the same
//! [`QaPipeline`].

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod types;

pub use config::QaConfig;
pub use error::{Error, Result};
pub use pipeline::QaPipeline;
pub use types::{
    answer::{ChunkAnswer, ChunkOutcome, FinalAnswer, FALLBACK_ANSWER},
    document::{Chunk, DocumentKind, ExtractedText},
};
