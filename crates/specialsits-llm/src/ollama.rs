//! Ollama adapters for the local backend

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use specialsits_core::error::{Result, SpecialSitsError};

use crate::ports::{Embedder, Generator};

/// Ollama embedder implementation
pub struct OllamaEmbedder {
    /// Base URL for the Ollama API (e.g. "http://localhost:11434")
    base_url: String,

    /// Model name to use for embeddings
    model: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with the default localhost URL
    pub fn localhost(model: impl Into<String>) -> Self {
        Self::new("http://localhost:11434", model)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for text in texts {
            let request = OllamaEmbedRequest {
                model: self.model.clone(),
                prompt: (*text).to_string(),
            };

            let response = self
                .client
                .post(format!("{}/api/embeddings", self.base_url))
                .json(&request)
                .send()
                .await
                .map_err(|e| SpecialSitsError::EmbedderUnavailable {
                    reason: format!("Failed to connect to Ollama: {}", e),
                    remediation: format!(
                        "Ensure Ollama is running at {} and the model '{}' is available. \
                         Run 'ollama pull {}' to download the model.",
                        self.base_url, self.model, self.model
                    ),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(SpecialSitsError::EmbedderUnavailable {
                    reason: format!("Ollama API error ({}): {}", status, error_text),
                    remediation: format!(
                        "Check that the model '{}' is available. Run 'ollama list' to see installed models.",
                        self.model
                    ),
                });
            }

            let embed_response: OllamaEmbedResponse =
                response.json().await.map_err(|e| SpecialSitsError::EmbedderUnavailable {
                    reason: format!("Failed to parse Ollama response: {}", e),
                    remediation: "Check Ollama API compatibility".to_string(),
                })?;

            embeddings.push(embed_response.embedding);
        }

        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Ollama text generator implementation
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with the default localhost URL
    pub fn localhost(model: impl Into<String>) -> Self {
        Self::new("http://localhost:11434", model)
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| SpecialSitsError::LlmUnavailable {
                reason: format!("Failed to connect to Ollama: {}", e),
                remediation: format!(
                    "Ensure Ollama is running at {} and the model '{}' is available.",
                    self.base_url, self.model
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpecialSitsError::LlmUnavailable {
                reason: format!("Ollama API error ({}): {}", status, error_text),
                remediation: format!("Run 'ollama pull {}' to download the model.", self.model),
            });
        }

        let generate_response: OllamaGenerateResponse =
            response.json().await.map_err(|e| SpecialSitsError::LlmUnavailable {
                reason: format!("Failed to parse Ollama response: {}", e),
                remediation: "Check Ollama API compatibility".to_string(),
            })?;

        Ok(generate_response.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for the Ollama embeddings API
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest {
    model: String,
    prompt: String,
}

/// Response from the Ollama embeddings API
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

/// Request body for the Ollama generate API
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}
