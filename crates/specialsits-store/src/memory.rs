//! In-memory storage implementations.
//!
//! Each extraction run owns a fresh pair of stores; nothing is cached across
//! runs. These implementations use `RwLock::unwrap()` intentionally: lock
//! poisoning only occurs when another thread panicked while holding the lock,
//! which is an unrecoverable state.

use async_trait::async_trait;
use specialsits_core::error::Result;
use specialsits_core::models::{Chunk, ChunkId, Embedding, ScoredChunk};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{DocumentStore, VectorStore};

/// In-memory implementation of VectorStore
#[derive(Debug, Clone, Default)]
pub struct MemoryVectorStore {
    embeddings: Arc<RwLock<HashMap<ChunkId, Embedding>>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate cosine similarity between two vectors
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn store_embeddings(&self, embeddings: &[Embedding]) -> Result<()> {
        let mut store = self.embeddings.write().unwrap();
        for embedding in embeddings {
            store.insert(embedding.chunk_id, embedding.clone());
        }
        Ok(())
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<ScoredChunk>> {
        let embeddings = self.embeddings.read().unwrap();

        let mut results: Vec<ScoredChunk> = embeddings
            .values()
            .map(|embedding| ScoredChunk {
                chunk_id: embedding.chunk_id,
                score: Self::cosine_similarity(query, &embedding.vector),
            })
            .collect();

        if let Some(threshold) = threshold {
            results.retain(|r| r.score >= threshold);
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    async fn get_embedding(&self, chunk_id: ChunkId) -> Result<Option<Embedding>> {
        let embeddings = self.embeddings.read().unwrap();
        Ok(embeddings.get(&chunk_id).cloned())
    }

    async fn delete_embeddings(&self, chunk_ids: &[ChunkId]) -> Result<()> {
        let mut embeddings = self.embeddings.write().unwrap();
        for chunk_id in chunk_ids {
            embeddings.remove(chunk_id);
        }
        Ok(())
    }

    async fn dimensions(&self) -> Result<usize> {
        let embeddings = self.embeddings.read().unwrap();
        Ok(embeddings.values().next().map(|e| e.vector.len()).unwrap_or(0))
    }
}

/// In-memory implementation of DocumentStore
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    chunks: Arc<RwLock<HashMap<ChunkId, Chunk>>>,
}

impl MemoryDocumentStore {
    /// Create a new in-memory document store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn store_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        let mut store = self.chunks.write().unwrap();
        for chunk in chunks {
            store.insert(chunk.id, chunk.clone());
        }
        Ok(())
    }

    async fn get_chunks(&self, ids: &[ChunkId]) -> Result<Vec<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        Ok(ids.iter().filter_map(|id| chunks.get(id).cloned()).collect())
    }

    async fn get_chunk(&self, id: ChunkId) -> Result<Option<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.get(&id).cloned())
    }

    async fn delete_chunks(&self, ids: &[ChunkId]) -> Result<()> {
        let mut chunks = self.chunks.write().unwrap();
        for id in ids {
            chunks.remove(id);
        }
        Ok(())
    }

    async fn list_chunk_ids(&self) -> Result<Vec<ChunkId>> {
        let chunks = self.chunks.read().unwrap();
        let mut ids: Vec<ChunkId> = chunks.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
