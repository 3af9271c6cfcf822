use std::str::FromStr;

use text_splitter::{ChunkConfig, TextSplitter};
use tracing::debug;

use crate::document::{ChunkMetadata, Document, TextChunk};
use crate::error::Error;

pub const CHUNK_SIZE: usize = 500; // characters
pub const CHUNK_OVERLAP: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Fixed-size sliding window over characters.
    #[default]
    Window,
    /// Prefer paragraph, sentence and word boundaries (text-splitter).
    Recursive,
}

impl FromStr for SplitStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "window" => Ok(SplitStrategy::Window),
            "recursive" => Ok(SplitStrategy::Recursive),
            other => Err(Error::Config(format!("unknown SPLIT_STRATEGY '{}'", other))),
        }
    }
}

pub fn split_documents(documents: &[Document], strategy: SplitStrategy) -> Vec<TextChunk> {
    let chunks: Vec<TextChunk> = documents
        .iter()
        // lopdf ends every text object with a newline, so blank pages are not ""
        .filter(|doc| !doc.text.trim().is_empty())
        .flat_map(|doc| {
            let source = doc.source.display().to_string();
            let pieces = match strategy {
                SplitStrategy::Window => window_split(&doc.text, CHUNK_SIZE, CHUNK_OVERLAP),
                SplitStrategy::Recursive => recursive_split(&doc.text, CHUNK_SIZE, CHUNK_OVERLAP),
            };
            pieces.into_iter().map(move |(start_index, text)| TextChunk {
                text,
                metadata: ChunkMetadata {
                    source: source.clone(),
                    page: doc.page,
                    start_index,
                },
            })
        })
        .collect();
    debug!(
        "Split {} documents into {} chunks",
        documents.len(),
        chunks.len()
    );
    chunks
}

/// Returns `(char_offset, chunk)` pairs. Window starts advance by `size - overlap`;
/// the last window ends exactly at the end of the text.
pub fn window_split(text: &str, size: usize, overlap: usize) -> Vec<(usize, String)> {
    assert!(overlap < size, "overlap must be smaller than chunk size");

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push((start, chars[start..end].iter().collect()));
        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }
    chunks
}

pub fn recursive_split(text: &str, size: usize, overlap: usize) -> Vec<(usize, String)> {
    let config = match ChunkConfig::new(size).with_overlap(overlap) {
        Ok(config) => config,
        // overlap >= size; fall back to no overlap
        Err(_) => ChunkConfig::new(size),
    };
    let splitter = TextSplitter::new(config);
    // chunk offsets only grow, so count characters from the previous chunk start
    let (mut byte_cursor, mut char_cursor) = (0, 0);
    splitter
        .chunk_indices(text)
        .map(|(byte_offset, chunk)| {
            char_cursor += text[byte_cursor..byte_offset].chars().count();
            byte_cursor = byte_offset;
            (char_cursor, chunk.to_string())
        })
        .collect()
}
