//! Saving extracted text to disk

use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::Result;

/// Writes extracted text to `{dir}/{stem}{suffix}`
#[derive(Debug, Clone)]
pub struct TextWriter {
    dir: PathBuf,
    suffix: String,
}

impl TextWriter {
    /// Create a writer from output config
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            suffix: config.suffix.clone(),
        }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output path for a source document name
    pub fn output_path(&self, source_filename: &str) -> PathBuf {
        let stem = Path::new(source_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "output".to_string());
        self.dir.join(format!("{}{}", stem, self.suffix))
    }

    /// Write text, creating the output directory if needed
    pub fn save(&self, source_filename: &str, text: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.output_path(source_filename);
        std::fs::write(&path, text)?;
        tracing::info!("Saved parsed text to {}", path.display());
        Ok(path)
    }
}
