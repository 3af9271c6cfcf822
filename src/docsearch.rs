use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::all_minilm_l6_v2::EMBED_BATCH_SIZE;
use crate::document::TextChunk;
use crate::embedding::{embed_in_batches, Embedder};
use crate::error::{Error, Result};
use crate::vector_index::{IndexEntry, VectorIndex};

const UPSERT_BATCH_SIZE: usize = 100;

/// A named remote index paired with the embedder used to query it.
#[derive(Clone)]
pub struct DocSearch {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    name: String,
}

impl DocSearch {
    /// Attach to an index that is already populated. Nothing is embedded.
    pub fn from_existing_index(
        name: &str,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            index,
            embedder,
            name: name.to_string(),
        }
    }

    /// Embed every chunk and upsert it into `name`.
    pub async fn from_documents(
        chunks: Vec<TextChunk>,
        name: &str,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embed_in_batches(embedder.as_ref(), texts, EMBED_BATCH_SIZE).await?;

        let mut entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexEntry { vector, chunk })
            .collect();
        let total = entries.len();

        while !entries.is_empty() {
            let rest = entries.split_off(entries.len().min(UPSERT_BATCH_SIZE));
            index.upsert(name, entries).await?;
            entries = rest;
        }
        info!("Stored {} chunks in index '{}'", total, name);

        Ok(Self::from_existing_index(name, index, embedder))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn similarity_search(&self, query: &str, k: u64) -> Result<Vec<(TextChunk, f32)>> {
        let vector = self
            .embedder
            .embed(vec![query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no vector returned for query".to_string()))?;

        let hits = self.index.search(&self.name, vector, k).await?;
        debug!("Retrieved {} chunks from '{}'", hits.len(), self.name);
        Ok(hits.into_iter().map(|hit| (hit.chunk, hit.score)).collect())
    }

    pub fn as_retriever(&self, k: u64) -> Retriever {
        Retriever {
            docsearch: self.clone(),
            k,
        }
    }
}

#[async_trait]
pub trait Retrieve: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<TextChunk>>;
}

/// Top-k similarity retriever over a [`DocSearch`].
pub struct Retriever {
    docsearch: DocSearch,
    k: u64,
}

#[async_trait]
impl Retrieve for Retriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<TextChunk>> {
        let hits = self.docsearch.similarity_search(query, self.k).await?;
        Ok(hits.into_iter().map(|(chunk, _)| chunk).collect())
    }
}
