mod all_minilm_l6_v2;
mod chain;
mod config;
mod docsearch;
mod document;
mod embedding;
mod embedding_model_factory;
mod error;
mod index_bootstrap;
mod llm;
mod loader;
mod prompt;
mod qdrant_util;
mod splitter;
mod vector_index;
mod web;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::all_minilm_l6_v2::VECTOR_SIZE;
use crate::chain::RagChain;
use crate::config::{Config, RETRIEVAL_K};
use crate::embedding::{Embedder, FastEmbedder};
use crate::index_bootstrap::{create_index_if_not_exists, load_or_create_docsearch};
use crate::llm::OpenAiCompletions;
use crate::prompt::PromptTemplate;
use crate::qdrant_util::QdrantIndex;
use crate::vector_index::VectorIndex;
use crate::web::{AppState, Pages};

#[tokio::main]
async fn main() -> Result<()> {
    // Reads .env first so RUST_LOG can live there too
    let config = Config::from_env().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let embedder: Arc<dyn Embedder> = Arc::new(
        FastEmbedder::new()
            .await
            .context("failed to load embedding model")?,
    );
    info!("Embedding model: {}", embedder.model_name());

    let index: Arc<dyn VectorIndex> = Arc::new(
        QdrantIndex::connect(&config.qdrant_url, &config.qdrant_api_key)
            .context("failed to build Qdrant client")?,
    );

    // 1. Create or verify the index
    create_index_if_not_exists(
        index.as_ref(),
        &config.index_name,
        VECTOR_SIZE,
        embedder.as_ref(),
    )
    .await?;

    // 2. Attach to it, or fill it from the PDF folder
    let docsearch = load_or_create_docsearch(&config, index, embedder)
        .await
        .context("failed to prepare document index")?;
    info!("Serving answers from index '{}'", docsearch.name());

    // 3. Retrieve-then-read chain
    let llm = OpenAiCompletions::new(
        &config.openai_base_url,
        &config.openai_api_key,
        &config.openai_model,
    );
    let chain = RagChain::new(
        Arc::new(docsearch.as_retriever(RETRIEVAL_K)),
        Arc::new(llm),
        PromptTemplate::new()?,
    );

    let state = Arc::new(AppState {
        chain: Arc::new(chain),
        pages: Pages::new()?,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, web::router(state)).await?;

    Ok(())
}
