//! The document question answering pipeline
//!
//! detect → extract → chunk → generate per chunk → select

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::generation::{select_answer, AnswerGenerator};
use crate::ingestion::{unsupported, DocumentParser, TextChunker, TextWriter};
use crate::providers::{LlmProvider, OllamaLlm};
use crate::types::{ChunkAnswer, DocumentKind, ExtractedText, FinalAnswer};

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct QaReport {
    /// The extracted document
    pub document: ExtractedText,
    /// Number of chunks the text was split into
    pub chunks_total: usize,
    /// Per-chunk results, in chunk order
    pub answers: Vec<ChunkAnswer>,
    /// Selected answer
    pub answer: FinalAnswer,
    /// Where the extracted text was written, if it was saved
    pub saved_to: Option<PathBuf>,
}

/// Shared pipeline used by the CLI and the web server
pub struct QaPipeline {
    parser: DocumentParser,
    chunker: TextChunker,
    generator: AnswerGenerator,
    writer: TextWriter,
    save_extracted: bool,
}

impl QaPipeline {
    /// Create a pipeline around an injected model provider
    pub fn new(config: &QaConfig, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            parser: DocumentParser::new(&config.extraction),
            chunker: TextChunker::from_config(&config.chunking),
            generator: AnswerGenerator::new(llm, &config.generation),
            writer: TextWriter::new(&config.output),
            save_extracted: config.output.save_extracted,
        }
    }

    /// Create a pipeline backed by Ollama
    pub fn from_config(config: &QaConfig) -> Result<Self> {
        let llm = OllamaLlm::new(&config.llm)?;
        Ok(Self::new(config, Arc::new(llm)))
    }

    /// Toggle saving of extracted text on every run
    pub fn with_save_extracted(mut self, save: bool) -> Self {
        self.save_extracted = save;
        self
    }

    /// The model provider
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        self.generator.llm()
    }

    /// The chunker in use
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Detect the kind and extract the text of a document.
    /// Unsupported kinds fail before the file is touched.
    pub async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let kind = DocumentKind::detect(path);
        if !kind.is_supported() {
            return Err(unsupported(path));
        }

        let parser = self.parser.clone();
        let path_buf = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || parser.parse_file(&path_buf))
            .await
            .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))??;

        tracing::info!(
            "Extracted {} chars from {} ({})",
            text.char_count(),
            text.filename,
            text.kind
        );
        Ok(text)
    }

    /// Write extracted text to the output directory
    pub fn save_extracted(&self, text: &ExtractedText) -> Result<PathBuf> {
        self.writer.save(&text.filename, &text.content)
    }

    /// Chunk, generate and select over already extracted text
    pub async fn answer_text(&self, question: &str, text: &str) -> (usize, Vec<ChunkAnswer>, FinalAnswer) {
        let chunks = self.chunker.chunk(text);
        tracing::info!("Split text into {} chunks of up to {} chars", chunks.len(), self.chunker.max_chars());

        let answers = self.generator.answer_chunks(question, &chunks).await;
        let answer = select_answer(&answers);

        match answer.chunk_index {
            Some(index) => tracing::info!("Answer taken from chunk {}", index),
            None => tracing::info!("No chunk produced an answer"),
        }

        (chunks.len(), answers, answer)
    }

    /// Run the pipeline over an already extracted document
    pub async fn ask_text(&self, question: &str, document: ExtractedText) -> Result<QaReport> {
        let saved_to = if self.save_extracted {
            Some(self.save_extracted(&document)?)
        } else {
            None
        };

        let (chunks_total, answers, answer) = self.answer_text(question, &document.content).await;

        Ok(QaReport {
            document,
            chunks_total,
            answers,
            answer,
            saved_to,
        })
    }

    /// Answer a question about the document at `path`
    pub async fn ask_file(&self, path: &Path, question: &str) -> Result<QaReport> {
        let document = self.extract(path).await?;
        self.ask_text(question, document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::MockLlmProvider;
    use crate::types::FALLBACK_ANSWER;

    fn pipeline(llm: MockLlmProvider) -> QaPipeline {
        QaPipeline::new(&QaConfig::default(), Arc::new(llm))
    }

    #[tokio::test]
    async fn test_html_file_is_answered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<html><body><p>Hello world</p></body></html>").unwrap();

        let mut llm = MockLlmProvider::new();
        llm.expect_generate()
            .withf(|prompt, _| prompt.contains("context:\nHello world\n\nQuestion: Greeting?\nAnswer:"))
            .times(1)
            .returning(|_, _| Ok("  Hello \n".to_string()));

        let report = pipeline(llm).ask_file(&path, "Greeting?").await.unwrap();

        assert_eq!(report.document.content, "Hello world");
        assert_eq!(report.chunks_total, 1);
        assert_eq!(report.answer, FinalAnswer::from_chunk(0, "Hello"));
        assert!(report.saved_to.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_file_is_not_read() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate().never();

        // The file does not exist, so any read attempt would surface as FileParse
        let err = pipeline(llm)
            .ask_file(Path::new("/nonexistent/report.docx"), "q")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_parse_error() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate().never();

        let err = pipeline(llm)
            .ask_file(Path::new("/nonexistent/notes.md"), "q")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[tokio::test]
    async fn test_empty_text_returns_fallback_without_calls() {
        let mut llm = MockLlmProvider::new();
        llm.expect_generate().never();

        let (chunks_total, answers, answer) = pipeline(llm).answer_text("q", "").await;

        assert_eq!(chunks_total, 0);
        assert!(answers.is_empty());
        assert_eq!(answer.text, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_multi_chunk_first_answer_wins() {
        let mut config = QaConfig::default();
        config.chunking.max_chars = 5;

        let mut llm = MockLlmProvider::new();
        llm.expect_generate().times(3).returning(|prompt, _| {
            if prompt.contains("fghij") {
                Ok("second".to_string())
            } else if prompt.contains("klm") {
                Ok("third".to_string())
            } else {
                Ok(String::new())
            }
        });

        let pipeline = QaPipeline::new(&config, Arc::new(llm));
        let (chunks_total, answers, answer) = pipeline.answer_text("q", "abcdefghijklm").await;

        assert_eq!(chunks_total, 3);
        assert_eq!(answers.len(), 3);
        assert_eq!(answer, FinalAnswer::from_chunk(1, "second"));
    }

    #[tokio::test]
    async fn test_save_extracted_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.md");
        std::fs::write(&source, "# Title\n\nBody text.").unwrap();

        let mut config = QaConfig::default();
        config.output.dir = dir.path().join("out");
        config.output.save_extracted = true;

        let mut llm = MockLlmProvider::new();
        llm.expect_generate().returning(|_, _| Ok("Body".to_string()));

        let pipeline = QaPipeline::new(&config, Arc::new(llm));
        let report = pipeline.ask_file(&source, "What?").await.unwrap();

        let saved = report.saved_to.unwrap();
        assert_eq!(saved, dir.path().join("out").join("notes_parsed.txt"));
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "Title Body text.");
    }
}
