use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    vectors_config::Config as VectorsConfigKind, CountPointsBuilder, CreateCollectionBuilder,
    Distance, PointStruct, ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder, Value,
    VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::document::{ChunkMetadata, TextChunk};
use crate::error::Result;
use crate::vector_index::{IndexEntry, ScoredChunk, VectorIndex};

/// Qdrant collections play the role of named indexes.
pub struct QdrantIndex {
    client: Qdrant,
}

impl QdrantIndex {
    pub fn connect(url: &str, api_key: &str) -> Result<Self> {
        debug!("Connecting to Qdrant at {}", url);
        let client = Qdrant::from_url(url)
            .api_key(api_key.to_string())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let response = self.client.list_collections().await?;
        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }

    async fn create_index(&self, name: &str, dimension: u64) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await?;
        info!("created collection '{}' in Qdrant", name);
        Ok(())
    }

    async fn index_dimension(&self, name: &str) -> Result<Option<u64>> {
        if !self.client.collection_exists(name).await? {
            return Ok(None);
        }
        let info = self.client.collection_info(name).await?;
        let size = info
            .result
            .and_then(|r| r.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|kind| match kind {
                VectorsConfigKind::Params(params) => Some(params.size),
                VectorsConfigKind::ParamsMap(_) => None,
            });
        Ok(size)
    }

    async fn count(&self, name: &str) -> Result<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(name).exact(true))
            .await?;
        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        debug!("Upserting {} points to collection {}", entries.len(), name);
        let points: Vec<PointStruct> = entries.into_iter().map(entry_to_point).collect();
        self.client
            .upsert_points(UpsertPointsBuilder::new(name, points).wait(true))
            .await?;
        Ok(())
    }

    async fn search(&self, name: &str, vector: Vec<f32>, limit: u64) -> Result<Vec<ScoredChunk>> {
        let response = self
            .client
            .search_points(SearchPointsBuilder::new(name, vector, limit).with_payload(true))
            .await?;
        Ok(response
            .result
            .into_iter()
            .filter_map(scored_point_to_chunk)
            .collect())
    }
}

fn entry_to_point(entry: IndexEntry) -> PointStruct {
    let IndexEntry { vector, chunk } = entry;
    let mut payload: HashMap<String, Value> = HashMap::new();
    payload.insert("text".to_string(), Value::from(chunk.text));
    payload.insert("source".to_string(), Value::from(chunk.metadata.source));
    payload.insert("page".to_string(), Value::from(chunk.metadata.page as i64));
    payload.insert(
        "start_index".to_string(),
        Value::from(chunk.metadata.start_index as i64),
    );
    PointStruct::new(Uuid::new_v4().to_string(), vector, payload)
}

/// Points without a `text` payload were not written by us and are skipped.
fn scored_point_to_chunk(point: ScoredPoint) -> Option<ScoredChunk> {
    let payload = point.payload;
    let text = payload.get("text")?.as_str()?.to_string();
    let source = payload
        .get("source")
        .and_then(|v| v.as_str())
        .cloned()
        .unwrap_or_default();
    let int = |key: &str| payload.get(key).and_then(|v| v.as_integer()).unwrap_or(0);

    Some(ScoredChunk {
        chunk: TextChunk {
            text,
            metadata: ChunkMetadata {
                source,
                page: int("page") as u32,
                start_index: int("start_index") as usize,
            },
        },
        score: point.score,
    })
}
