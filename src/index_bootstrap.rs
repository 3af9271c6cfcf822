//! Startup work against the remote index: make sure it exists, then either
//! attach to it or fill it from the PDF folder.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::docsearch::DocSearch;
use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::loader::load_pdf_folder;
use crate::splitter::split_documents;
use crate::vector_index::VectorIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Created,
    AlreadyExists,
    /// Listing or creation failed; the error was logged and startup continues.
    Skipped,
}

fn check_dimension(name: &str, embedder: &dyn Embedder, expected: u64) -> Result<()> {
    if embedder.dimension() as u64 != expected {
        return Err(Error::DimensionMismatch {
            index: name.to_string(),
            model: embedder.dimension(),
            expected,
        });
    }
    Ok(())
}

/// Create `name` unless it is already listed.
///
/// A dimension mismatch between the model and `dimension` is an error. Any other
/// failure is logged and reported as [`IndexStatus::Skipped`].
pub async fn create_index_if_not_exists(
    index: &dyn VectorIndex,
    name: &str,
    dimension: u64,
    embedder: &dyn Embedder,
) -> Result<IndexStatus> {
    check_dimension(name, embedder, dimension)?;

    let existing = match index.list_indexes().await {
        Ok(existing) => existing,
        Err(e) => {
            warn!("Index creation skipped due to error: {}", e);
            return Ok(IndexStatus::Skipped);
        }
    };

    if existing.iter().any(|n| n == name) {
        info!("Index '{}' already exists. Skipping creation.", name);
        return Ok(IndexStatus::AlreadyExists);
    }

    match index.create_index(name, dimension).await {
        Ok(()) => {
            info!("Index '{}' created.", name);
            Ok(IndexStatus::Created)
        }
        Err(e) => {
            warn!("Index creation skipped due to error: {}", e);
            Ok(IndexStatus::Skipped)
        }
    }
}

/// Attach to the configured index if it already holds points, otherwise load,
/// split, embed and upsert the PDF folder into it.
pub async fn load_or_create_docsearch(
    config: &Config,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
) -> Result<DocSearch> {
    let name = config.index_name.as_str();

    let existing = index.list_indexes().await?;
    if existing.iter().any(|n| n == name) {
        if let Some(dimension) = index.index_dimension(name).await? {
            check_dimension(name, embedder.as_ref(), dimension)?;
        }
        let points = index.count(name).await?;
        if points > 0 {
            info!("Using existing index '{}' ({} points)", name, points);
            return Ok(DocSearch::from_existing_index(name, index, embedder));
        }
    }

    info!("Creating new index contents for '{}' from {}", name, config.data_dir.display());
    let documents = load_pdf_folder(&config.data_dir).await?;
    let chunks = split_documents(&documents, config.split_strategy);
    DocSearch::from_documents(chunks, name, index, embedder).await
}
