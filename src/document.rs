use std::path::PathBuf;

/// Text of a single PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub source: PathBuf,
    /// Page number as reported by the PDF (1-based).
    pub page: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMetadata {
    pub source: String,
    pub page: u32,
    /// Character offset of the chunk inside its page.
    pub start_index: usize,
}

/// The unit that is embedded, stored and retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}
