//! In-memory doubles for the external services, shared by unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::chain::{AnswerChain, ChainOutput};
use crate::document::{ChunkMetadata, TextChunk};
use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::vector_index::{IndexEntry, ScoredChunk, VectorIndex};

pub fn chunk(text: &str) -> TextChunk {
    TextChunk {
        text: text.to_string(),
        metadata: ChunkMetadata {
            source: "Data/test.pdf".to_string(),
            page: 1,
            start_index: 0,
        },
    }
}

/// Deterministic bag-of-letters embedder.
pub struct FakeEmbedder {
    dimension: usize,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }

    pub fn vector_for(text: &str, dimension: usize) -> Vec<f32> {
        let mut vector = vec![0.0; dimension];
        for c in text.chars().filter(|c| c.is_alphanumeric()) {
            vector[(c.to_ascii_lowercase() as usize) % dimension] += 1.0;
        }
        vector
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts_embedded(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| Self::vector_for(t, self.dimension))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
pub struct FakeIndex {
    indexes: Mutex<BTreeMap<String, (u64, Vec<IndexEntry>)>>,
    pub creates: AtomicUsize,
    pub upserts: AtomicUsize,
    pub fail_create: AtomicBool,
}

impl FakeIndex {
    pub fn with_index(name: &str, dimension: u64, entries: Vec<IndexEntry>) -> Self {
        let index = Self::default();
        index
            .indexes
            .lock()
            .unwrap()
            .insert(name.to_string(), (dimension, entries));
        index
    }

    pub fn len(&self, name: &str) -> usize {
        self.indexes
            .lock()
            .unwrap()
            .get(name)
            .map(|(_, entries)| entries.len())
            .unwrap_or(0)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        Ok(self.indexes.lock().unwrap().keys().cloned().collect())
    }

    async fn create_index(&self, name: &str, dimension: u64) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::Qdrant("quota exceeded".to_string()));
        }
        let mut indexes = self.indexes.lock().unwrap();
        if indexes.contains_key(name) {
            return Err(Error::Qdrant(format!("index '{}' already exists", name)));
        }
        indexes.insert(name.to_string(), (dimension, Vec::new()));
        Ok(())
    }

    async fn index_dimension(&self, name: &str) -> Result<Option<u64>> {
        Ok(self.indexes.lock().unwrap().get(name).map(|(dim, _)| *dim))
    }

    async fn count(&self, name: &str) -> Result<u64> {
        Ok(self.len(name) as u64)
    }

    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> Result<()> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let mut indexes = self.indexes.lock().unwrap();
        let (_, stored) = indexes
            .get_mut(name)
            .ok_or_else(|| Error::Qdrant(format!("index '{}' not found", name)))?;
        stored.extend(entries);
        Ok(())
    }

    async fn search(&self, name: &str, vector: Vec<f32>, limit: u64) -> Result<Vec<ScoredChunk>> {
        let indexes = self.indexes.lock().unwrap();
        let (_, stored) = indexes
            .get(name)
            .ok_or_else(|| Error::Qdrant(format!("index '{}' not found", name)))?;
        let mut scored: Vec<ScoredChunk> = stored
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine(&entry.vector, &vector),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit as usize);
        Ok(scored)
    }
}

/// Chain double that records questions and answers with a canned reply.
#[derive(Default)]
pub struct FakeChain {
    pub invocations: Mutex<Vec<String>>,
    pub fail: bool,
}

impl FakeChain {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerChain for FakeChain {
    async fn invoke(&self, input: &str) -> Result<ChainOutput> {
        self.invocations.lock().unwrap().push(input.to_string());
        if self.fail {
            return Err(Error::EmptyCompletion);
        }
        Ok(ChainOutput {
            input: input.to_string(),
            context: vec![chunk("retrieved passage")],
            answer: format!("Answer to: {}", input),
        })
    }
}

/// Write a minimal PDF with one line of Courier text per page.
pub fn write_pdf(path: &std::path::Path, pages: &[&str]) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
