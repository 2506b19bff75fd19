//! Configuration for document question answering

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable pointing at a TOML config file
pub const CONFIG_ENV: &str = "DOC_QA_CONFIG";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Web UI server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Text extraction configuration
    pub extraction: ExtractionConfig,
    /// Per-chunk generation configuration
    pub generation: GenerationConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Extracted text output configuration
    pub output: OutputConfig,
}

impl QaConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load configuration: explicit path, then `$DOC_QA_CONFIG`, then the user
    /// config dir, then defaults. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::locate(explicit) {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("doc-qa").join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// Apply `DOC_QA_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DOC_QA_OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("DOC_QA_MODEL") {
            self.llm.model = model;
        }
        if let Some(dir) = lookup("DOC_QA_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("DOC_QA_HOST") {
            self.server.host = host;
        }
        match lookup("DOC_QA_MAX_CHUNK_CHARS").map(|v| v.parse::<usize>()) {
            Some(Ok(max_chars)) => self.chunking.max_chars = max_chars,
            Some(Err(e)) => tracing::warn!("Ignoring DOC_QA_MAX_CHUNK_CHARS: {}", e),
            None => {}
        }
        match lookup("DOC_QA_PORT").map(|v| v.parse::<u16>()) {
            Some(Ok(port)) => self.server.port = port,
            Some(Err(e)) => tracing::warn!("Ignoring DOC_QA_PORT: {}", e),
            None => {}
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
    /// Parent directory for per-request upload dirs (default: system temp dir)
    pub upload_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
            upload_dir: None,
        }
    }
}

/// How chunk boundaries are chosen
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Fixed-size character windows, breaks may fall mid-word
    #[default]
    Fixed,
    /// Pack whole sentences up to the size limit
    Sentence,
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_chars: usize,
    /// Boundary strategy
    pub strategy: ChunkStrategy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            strategy: ChunkStrategy::Fixed,
        }
    }
}

/// PDF text layout
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PdfLayout {
    /// Newlines collapsed to spaces, pages joined by a space
    #[default]
    Flat,
    /// `--- Page N ---` markers, newlines preserved
    Paged,
}

/// Text extraction configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Layout of extracted PDF text
    pub pdf_layout: PdfLayout,
}

/// Per-chunk generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Upper bound on generated tokens per chunk
    pub max_new_tokens: u32,
    /// Let the model truncate prompts longer than its context window
    pub truncate: bool,
    /// Stop querying chunks once one of them produced a non-empty answer
    pub stop_at_first_answer: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 200,
            truncate: true,
            stop_at_first_answer: false,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Context window size (tokens)
    pub context_size: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "phi3".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            context_size: 4096,
        }
    }
}

/// Where extracted text is saved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, created on first save
    pub dir: PathBuf,
    /// Suffix appended to the source file stem
    pub suffix: String,
    /// Save extracted text on every pipeline run
    pub save_extracted: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("parsed_texts"),
            suffix: "_parsed.txt".to_string(),
            save_extracted: false,
        }
    }
}
