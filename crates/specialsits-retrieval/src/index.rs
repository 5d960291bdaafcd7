//! Index building and retrieval over per-run stores

use std::sync::Arc;

use specialsits_core::error::Result;
use specialsits_core::models::{Chunk, ChunkId, Embedding};
use specialsits_llm::Embedder;
use specialsits_store::ports::{DocumentStore, VectorStore};

/// Result of an index build operation
#[derive(Debug, Clone, Default)]
pub struct IndexBuildResult {
    /// Total number of chunks indexed
    pub chunk_count: usize,

    /// Embedding dimension
    pub embedding_dim: usize,
}

/// Builds a similarity index by embedding chunks into the vector store.
pub struct IndexBuilder {
    document_store: Arc<dyn DocumentStore>,
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl IndexBuilder {
    pub fn new(
        document_store: Arc<dyn DocumentStore>,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self { document_store, vector_store, embedder, batch_size: 32 }
    }

    /// Set the batch size for embedding generation
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Embed every chunk and store chunks plus vectors.
    ///
    /// All embeddings are generated before anything is written, so an
    /// embedding failure aborts the run without leaving a partial index
    /// visible to later retrieval calls.
    pub async fn build(&self, chunks: &[Chunk]) -> Result<IndexBuildResult> {
        let mut embeddings: Vec<Embedding> = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let vectors = self.embedder.embed(&texts).await?;

            for (chunk, vector) in batch.iter().zip(vectors.into_iter()) {
                embeddings.push(Embedding { chunk_id: chunk.id, vector });
            }
        }

        let embedding_dim = embeddings.first().map(|e| e.vector.len()).unwrap_or(0);

        self.document_store.store_chunks(chunks).await?;
        self.vector_store.store_embeddings(&embeddings).await?;

        tracing::debug!(
            chunk_count = chunks.len(),
            embedding_dim,
            model = self.embedder.model_name(),
            "Index built"
        );

        Ok(IndexBuildResult { chunk_count: chunks.len(), embedding_dim })
    }
}

/// Read-only retrieval over a built index.
pub struct Retriever {
    document_store: Arc<dyn DocumentStore>,
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    pub fn new(
        document_store: Arc<dyn DocumentStore>,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self { document_store, vector_store, embedder }
    }

    /// Return the k chunks nearest to the query. Never mutates the index.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        let query_vectors = self.embedder.embed(&[query]).await?;
        let query_vector = query_vectors.into_iter().next().unwrap_or_default();

        let scored = self.vector_store.similarity_search(&query_vector, k, None).await?;
        let ids: Vec<ChunkId> = scored.iter().map(|s| s.chunk_id).collect();

        self.document_store.get_chunks(&ids).await
    }
}
