//! Document kind, extracted text and chunk types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Extensions accepted by the upload form, without the leading dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "md", "markdown", "html", "htm"];

/// Document category, decided by file extension alone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// PDF document
    Pdf,
    /// Markdown file
    Markdown,
    /// HTML document
    Html,
    /// Anything else
    Unsupported,
}

impl DocumentKind {
    /// Detect kind from an extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            _ => Self::Unsupported,
        }
    }

    /// Detect kind from a file path. The file is never opened.
    pub fn detect(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unsupported)
    }

    /// Check if this is a supported kind
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Markdown => "Markdown",
            Self::Html => "HTML",
            Self::Unsupported => "Unsupported",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// All text extracted from one document, markup removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// File name of the source document
    pub filename: String,
    /// Detected kind
    pub kind: DocumentKind,
    /// Extracted text content
    pub content: String,
    /// Total pages (PDF only)
    pub total_pages: Option<u32>,
}

impl ExtractedText {
    /// Create extracted text for a document
    pub fn new(filename: impl Into<String>, kind: DocumentKind, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            kind,
            content: content.into(),
            total_pages: None,
        }
    }

    /// Set the page count
    pub fn with_pages(mut self, total_pages: u32) -> Self {
        self.total_pages = Some(total_pages);
        self
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// True when nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A contiguous slice of extracted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in document order (0-indexed)
    pub index: usize,
    /// Chunk text
    pub content: String,
    /// Character offset of the first character in the extracted text
    pub char_offset: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, content: impl Into<String>, char_offset: usize) -> Self {
        Self {
            index,
            content: content.into(),
            char_offset,
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(DocumentKind::detect("notes/report.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::detect("README.md"), DocumentKind::Markdown);
        assert_eq!(DocumentKind::detect("guide.markdown"), DocumentKind::Markdown);
        assert_eq!(DocumentKind::detect("index.html"), DocumentKind::Html);
        assert_eq!(DocumentKind::detect("index.htm"), DocumentKind::Html);
        assert_eq!(DocumentKind::detect("letter.docx"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::detect("Makefile"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::detect(".pdf"), DocumentKind::Unsupported);
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(DocumentKind::detect("SCAN.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::detect("Page.HtMl"), DocumentKind::Html);
        assert_eq!(DocumentKind::from_extension(".MarkDown"), DocumentKind::Markdown);
    }

    #[test]
    fn test_detect_ignores_content() {
        // A path that does not exist still resolves
        let kind = DocumentKind::detect("/definitely/missing/file.htm");
        assert_eq!(kind, DocumentKind::Html);
        assert!(kind.is_supported());
        assert!(!DocumentKind::Unsupported.is_supported());
    }

    #[test]
    fn test_supported_extensions_agree_with_detection() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(DocumentKind::from_extension(ext).is_supported(), "{ext}");
        }
    }
}
