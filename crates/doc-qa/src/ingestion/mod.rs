//! Document ingestion: extraction, chunking and saving extracted text

mod chunker;
pub mod output;
mod parser;

pub use chunker::TextChunker;
pub use output::TextWriter;
pub use parser::{html_to_text, markdown_to_text, render_flat, render_paged, DocumentParser};
pub(crate) use parser::unsupported;
