//! Remote vector store seam.

use async_trait::async_trait;

use crate::document::TextChunk;
use crate::error::Result;

/// One point to be written: embedding plus the chunk it was computed from.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub vector: Vec<f32>,
    pub chunk: TextChunk,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: TextChunk,
    pub score: f32,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn list_indexes(&self) -> Result<Vec<String>>;

    /// Create a cosine-distance index of the given dimension.
    async fn create_index(&self, name: &str, dimension: u64) -> Result<()>;

    /// Configured vector size of an existing index, `None` if it does not exist.
    async fn index_dimension(&self, name: &str) -> Result<Option<u64>>;

    async fn count(&self, name: &str) -> Result<u64>;

    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> Result<()>;

    async fn search(&self, name: &str, vector: Vec<f32>, limit: u64) -> Result<Vec<ScoredChunk>>;
}
