//! Domain models

pub mod dataset;
pub mod document;
pub mod mapper;

pub use dataset::Dataset;
pub use document::{Chunk, ChunkId, Document, Embedding, ScoredChunk};
pub use mapper::{FilingMapper, FilingRecord};
