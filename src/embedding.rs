use std::sync::Arc;

use async_trait::async_trait;
use fastembed::TextEmbedding;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::all_minilm_l6_v2::MODEL_NAME;
use crate::embedding_model_factory;
use crate::error::{Error, Result};

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Dimension of the vectors this model actually produces.
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    dimension: usize,
}

impl FastEmbedder {
    /// Load the model and probe it once to learn its output dimension.
    pub async fn new() -> Result<Self> {
        let model = tokio::task::spawn_blocking(embedding_model_factory::get_model)
            .await
            .map_err(|e| Error::Embedding(format!("Task join error: {}", e)))??;

        let mut embedder = Self {
            model: Arc::new(Mutex::new(model)),
            dimension: 0,
        };
        let probe = embedder.embed(vec!["dimension probe".to_string()]).await?;
        embedder.dimension = probe.first().map(Vec::len).unwrap_or_default();

        info!(
            "Embedding model {} ready ({} dimensions)",
            MODEL_NAME, embedder.dimension
        );
        Ok(embedder)
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Embedding {} texts", texts.len());

        let model = self.model.clone();
        tokio::task::spawn_blocking(move || {
            let model = model.blocking_lock();
            model.embed(texts, None)
        })
        .await
        .map_err(|e| Error::Embedding(format!("Task join error: {}", e)))?
        .map_err(|e| Error::Embedding(format!("Embedding failed: {}", e)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}

pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut all_embeddings = Vec::with_capacity(texts.len());
    for batch in texts.chunks(batch_size.max(1)) {
        let embeddings = embedder.embed(batch.to_vec()).await?;
        if embeddings.len() != batch.len() {
            return Err(Error::Embedding(format!(
                "model returned {} vectors for {} texts",
                embeddings.len(),
                batch.len()
            )));
        }
        all_embeddings.extend(embeddings);
    }
    Ok(all_embeddings)
}
