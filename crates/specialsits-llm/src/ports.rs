//! LLM port definitions

use async_trait::async_trait;
use specialsits_core::error::Result;

/// Port for embedding text into vector representations
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of texts, one vector per input.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Name of the embedding model
    fn model_name(&self) -> &str;
}

/// Port for text generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the prompt and return the raw text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the generation model
    fn model_name(&self) -> &str;
}
