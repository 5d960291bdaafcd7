use serde::{Deserialize, Serialize};

/// A normalized source filing.
///
/// `content` is plain text with markup stripped and whitespace runs collapsed
/// to single spaces. Documents are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier (file name of the filing)
    pub source: String,

    /// Normalized text content
    pub content: String,
}

impl Document {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self { source: source.into(), content: content.into() }
    }
}

/// Unique identifier for a text chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(pub u64);

impl ChunkId {
    /// Deterministic id from the document's position in the batch and the
    /// chunk's position within the document.
    pub fn from_positions(doc_index: u64, chunk_index: u64) -> Self {
        ChunkId((doc_index << 32) | chunk_index)
    }
}

/// A bounded span of a document's normalized text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier
    pub id: ChunkId,

    /// Parent document source identifier
    pub source: String,

    /// Text content (may include overlap with the preceding chunk)
    pub content: String,

    /// Char offset of this chunk within the parent document
    pub offset: usize,
}

/// Embedding vector for a chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Associated chunk ID
    pub chunk_id: ChunkId,

    /// Embedding vector
    pub vector: Vec<f32>,
}

/// Scored search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Chunk ID
    pub chunk_id: ChunkId,

    /// Similarity score
    pub score: f32,
}
