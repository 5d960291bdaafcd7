//! SpecialSits LLM - Embedding and generation ports
//!
//! This crate defines the ports for embedding and text generation, along with
//! adapter implementations for the local (Ollama) and hosted (OpenAI)
//! backends.

pub mod ollama;
pub mod openai;
pub mod ports;

use std::sync::Arc;

use specialsits_core::config::{LlmBackend, Settings};
use specialsits_core::error::{Result, SpecialSitsError};

pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use openai::{OpenAiEmbedder, OpenAiGenerator};
pub use ports::{Embedder, Generator};

/// Build the configured embedding backend.
pub fn build_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    match settings.backend {
        LlmBackend::Local => Ok(Arc::new(OllamaEmbedder::new(
            &settings.ollama_url,
            &settings.embed_model,
        ))),
        LlmBackend::OpenAi => {
            let api_key = require_api_key(settings)?;
            Ok(Arc::new(OpenAiEmbedder::new(api_key, &settings.embed_model)))
        }
    }
}

/// Build the configured generation backend.
pub fn build_generator(settings: &Settings) -> Result<Arc<dyn Generator>> {
    match settings.backend {
        LlmBackend::Local => Ok(Arc::new(OllamaGenerator::new(
            &settings.ollama_url,
            &settings.chat_model,
        ))),
        LlmBackend::OpenAi => {
            let api_key = require_api_key(settings)?;
            Ok(Arc::new(OpenAiGenerator::new(api_key, &settings.chat_model)))
        }
    }
}

fn require_api_key(settings: &Settings) -> Result<&str> {
    settings
        .openai_api_key
        .as_deref()
        .ok_or_else(|| SpecialSitsError::ConfigInvalid {
            key: "OPENAI_API_KEY".to_string(),
            reason: "required when SPECIALSITS_LLM_BACKEND=openai".to_string(),
        })
}
