//! Text extraction for PDF, Markdown and HTML documents

use pulldown_cmark::{html, Options, Parser};
use scraper::Html;
use std::path::Path;

use crate::config::{ExtractionConfig, PdfLayout};
use crate::error::{Error, Result};
use crate::types::{DocumentKind, ExtractedText, SUPPORTED_EXTENSIONS};

/// Elements whose text is never shown to a reader
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Marker used for pages without extractable text in the paged layout
const NO_TEXT_MARKER: &str = "[No extractable text]";

/// Fold characters that PDF fonts commonly emit into plain text
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ") // Non-breaking space -> space
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
}

/// Render pages with newlines collapsed, pages joined by a single space
pub fn render_flat(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.replace("\r\n", " ").replace(['\n', '\r'], " "))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Render pages with `--- Page N ---` headers, keeping newlines
pub fn render_paged(pages: &[String]) -> String {
    let mut text = String::new();
    for (i, page) in pages.iter().enumerate() {
        let page_number = i + 1;
        if page.trim().is_empty() {
            text.push_str(&format!("\n--- Page {} ---\n{}\n", page_number, NO_TEXT_MARKER));
        } else {
            text.push_str(&format!("\n--- Page {} ---\n{}", page_number, page));
        }
    }
    text
}

/// Strip tags from HTML, joining trimmed text nodes with single spaces
pub fn html_to_text(source: &str) -> String {
    let document = Html::parse_document(source);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

/// Render markdown to HTML, then strip tags
pub fn markdown_to_text(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(source, options);
    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    html_to_text(&rendered)
}

/// Extension-dispatched document parser
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    pdf_layout: PdfLayout,
}

impl DocumentParser {
    /// Create a parser from extraction config
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            pdf_layout: config.pdf_layout,
        }
    }

    /// Parser with an explicit PDF layout
    pub fn with_layout(pdf_layout: PdfLayout) -> Self {
        Self { pdf_layout }
    }

    /// Parse a file on disk. Unsupported kinds are rejected before the file is read.
    pub fn parse_file(&self, path: &Path) -> Result<ExtractedText> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let kind = DocumentKind::detect(path);
        if !kind.is_supported() {
            return Err(unsupported(path));
        }

        let data = std::fs::read(path).map_err(|e| Error::file_parse(&filename, e.to_string()))?;
        tracing::debug!("Read {} ({} bytes)", filename, data.len());

        self.parse_bytes(&filename, kind, &data)
    }

    /// Parse document bytes of a known kind
    pub fn parse_bytes(&self, filename: &str, kind: DocumentKind, data: &[u8]) -> Result<ExtractedText> {
        match kind {
            DocumentKind::Pdf => self.parse_pdf(filename, data),
            DocumentKind::Markdown => {
                let source = decode_utf8(filename, data)?;
                Ok(ExtractedText::new(filename, kind, markdown_to_text(source)))
            }
            DocumentKind::Html => {
                let source = decode_utf8(filename, data)?;
                Ok(ExtractedText::new(filename, kind, html_to_text(source)))
            }
            DocumentKind::Unsupported => Err(unsupported(Path::new(filename))),
        }
    }

    /// Parse PDF document
    fn parse_pdf(&self, filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let pages: Vec<String> = Self::extract_pdf_pages(filename, data)?
            .iter()
            .map(|page| cleanup_pdf_text(page))
            .collect();

        if pages.iter().all(|page| page.trim().is_empty()) {
            tracing::warn!("No text extracted from {}, PDF may be image-based", filename);
        }

        let content = match self.pdf_layout {
            PdfLayout::Flat => render_flat(&pages),
            PdfLayout::Paged => render_paged(&pages),
        };

        Ok(ExtractedText::new(filename, DocumentKind::Pdf, content).with_pages(pages.len() as u32))
    }

    /// Extract per-page text, falling back to lopdf when pdf-extract fails
    fn extract_pdf_pages(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        // pdf-extract panics on some malformed fonts
        let primary = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data));

        let primary_error = match primary {
            Ok(Ok(pages)) => return Ok(pages),
            Ok(Err(e)) => e.to_string(),
            Err(_) => "pdf-extract panicked".to_string(),
        };
        tracing::warn!("pdf-extract failed on {}: {}, trying fallback", filename, primary_error);

        Self::extract_pdf_pages_fallback(data).map_err(|fallback_error| {
            Error::file_parse(
                filename,
                format!("{} (fallback: {})", primary_error, fallback_error),
            )
        })
    }

    /// Fallback PDF text extraction using lopdf directly
    fn extract_pdf_pages_fallback(data: &[u8]) -> std::result::Result<Vec<String>, String> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| format!("Failed to load PDF: {}", e))?;

        let pages = doc
            .get_pages()
            .keys()
            .map(|&page_number| {
                doc.extract_text(&[page_number]).unwrap_or_else(|e| {
                    tracing::debug!("Could not get text for page {}: {}", page_number, e);
                    String::new()
                })
            })
            .collect();

        Ok(pages)
    }
}

fn decode_utf8<'a>(filename: &str, data: &'a [u8]) -> Result<&'a str> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::file_parse(filename, format!("File is not valid UTF-8: {}", e)))?;
    Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text))
}

pub(crate) fn unsupported(path: &Path) -> Error {
    let ext = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_else(|| "(no extension)".to_string());
    Error::UnsupportedFileType(format!(
        "{} - supported extensions: {}",
        ext,
        SUPPORTED_EXTENSIONS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_html_strips_tags() {
        let text = html_to_text("<html><body><p>Hello world</p></body></html>");
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_html_joins_nodes_with_single_space() {
        let text = html_to_text(
            "<html><head><title>Doc</title></head>\n<body>\n  <h1>Intro</h1>\n  <p>First <b>bold</b> line.</p>\n</body></html>",
        );
        assert_eq!(text, "Doc Intro First bold line.");
    }

    #[test]
    fn test_html_skips_script_and_style() {
        let text = html_to_text(
            "<html><head><style>p { color: red; }</style></head><body><script>var x = 1;</script><p>Visible</p></body></html>",
        );
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_markdown_heading_and_paragraph() {
        assert_eq!(markdown_to_text("# Title\n\nBody text."), "Title Body text.");
    }

    #[test]
    fn test_markdown_lists_and_emphasis() {
        let text = markdown_to_text("Some *emphasis* here.\n\n- one\n- two\n");
        assert_eq!(text, "Some emphasis here. one two");
    }

    #[test]
    fn test_empty_markdown_is_empty() {
        assert_eq!(markdown_to_text(""), "");
    }

    #[test]
    fn test_render_flat_collapses_newlines() {
        let pages = vec!["Line one\nline two\n".to_string(), "\nPage two".to_string()];
        assert_eq!(render_flat(&pages), "Line one line two   Page two");
    }

    #[test]
    fn test_render_paged_marks_empty_pages() {
        let pages = vec!["First page\ntext".to_string(), "  \n".to_string()];
        assert_eq!(
            render_paged(&pages),
            "\n--- Page 1 ---\nFirst page\ntext\n--- Page 2 ---\n[No extractable text]\n"
        );
    }

    #[test]
    fn test_cleanup_pdf_text() {
        assert_eq!(cleanup_pdf_text("\u{FB01}le\0 of\u{00A0}\u{FB02}ow"), "file of flow");
    }

    #[test]
    fn test_unsupported_rejected_before_read() {
        let parser = DocumentParser::default();
        // File does not exist, so reaching the read would yield FileParse instead
        let err = parser.parse_file(Path::new("/nonexistent/contract.docx")).unwrap_err();
        match err {
            Error::UnsupportedFileType(msg) => assert!(msg.starts_with(".docx")),
            other => panic!("expected UnsupportedFileType, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let parser = DocumentParser::default();
        let err = parser.parse_file(Path::new("/nonexistent/notes.md")).unwrap_err();
        assert!(matches!(err, Error::FileParse { ref filename, .. } if filename == "notes.md"));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let parser = DocumentParser::default();
        let err = parser
            .parse_bytes("page.html", DocumentKind::Html, &[0x3c, 0x70, 0xff, 0xfe])
            .unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let parser = DocumentParser::default();
        let err = parser
            .parse_bytes("broken.pdf", DocumentKind::Pdf, b"%PDF-1.4\nthis is not a pdf")
            .unwrap_err();
        assert!(matches!(err, Error::FileParse { ref filename, .. } if filename == "broken.pdf"));
    }

    #[test]
    fn test_parse_file_reads_html() {
        let mut file = tempfile::Builder::new().suffix(".HTM").tempfile().unwrap();
        file.write_all(b"<p>Hello</p><p>there</p>").unwrap();

        let text = DocumentParser::default().parse_file(file.path()).unwrap();
        assert_eq!(text.kind, DocumentKind::Html);
        assert_eq!(text.content, "Hello there");
        assert_eq!(text.total_pages, None);
    }

    #[test]
    fn test_bom_is_dropped() {
        let text = DocumentParser::default()
            .parse_bytes("a.md", DocumentKind::Markdown, "\u{FEFF}plain".as_bytes())
            .unwrap();
        assert_eq!(text.content, "plain");
    }
}
