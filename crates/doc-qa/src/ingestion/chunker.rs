//! Splitting extracted text into bounded-size chunks

use unicode_segmentation::UnicodeSegmentation;

use crate::config::{ChunkStrategy, ChunkingConfig};
use crate::types::Chunk;

/// Text chunker with a maximum size in characters
///
/// Chunks never overlap and always cover the input exactly, so joining
/// their contents yields the original text.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    max_chars: usize,
    /// Boundary strategy
    strategy: ChunkStrategy,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(ChunkingConfig::default().max_chars)
    }
}

impl TextChunker {
    /// Create a fixed-size chunker. A size of 0 is treated as 1.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            strategy: ChunkStrategy::Fixed,
        }
    }

    /// Create a chunker from config
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.max_chars).with_strategy(config.strategy)
    }

    /// Select the boundary strategy
    pub fn with_strategy(mut self, strategy: ChunkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Maximum chunk size in characters
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split text into ordered chunks
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut out = ChunkSink::default();
        match self.strategy {
            ChunkStrategy::Fixed => self.split_fixed(text, &mut out),
            ChunkStrategy::Sentence => self.split_sentences(text, &mut out),
        }
        out.chunks
    }

    /// Consecutive windows of `max_chars` characters
    fn split_fixed(&self, text: &str, out: &mut ChunkSink) {
        let mut start = 0usize;
        let mut count = 0usize;

        for (byte_idx, _) in text.char_indices() {
            if count == self.max_chars {
                out.push(&text[start..byte_idx], count);
                start = byte_idx;
                count = 0;
            }
            count += 1;
        }

        if count > 0 {
            out.push(&text[start..], count);
        }
    }

    /// Greedily pack whole sentences; sentences over the limit are hard-split
    fn split_sentences(&self, text: &str, out: &mut ChunkSink) {
        let mut start = 0usize;
        let mut end = 0usize;
        let mut count = 0usize;

        for sentence in text.split_sentence_bounds() {
            let len = sentence.chars().count();

            if count + len <= self.max_chars {
                end += sentence.len();
                count += len;
                continue;
            }

            if count > 0 {
                out.push(&text[start..end], count);
            }

            if len > self.max_chars {
                self.split_fixed(sentence, out);
                start = end + sentence.len();
                end = start;
                count = 0;
            } else {
                start = end;
                end += sentence.len();
                count = len;
            }
        }

        if count > 0 {
            out.push(&text[start..end], count);
        }
    }
}

/// Accumulates chunks while tracking character offsets
#[derive(Default)]
struct ChunkSink {
    chunks: Vec<Chunk>,
    char_offset: usize,
}

impl ChunkSink {
    fn push(&mut self, content: &str, char_len: usize) {
        let index = self.chunks.len();
        self.chunks.push(Chunk::new(index, content, self.char_offset));
        self.char_offset += char_len;
    }
}
