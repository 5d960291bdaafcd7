//! OpenAI adapters for the hosted backend

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use specialsits_core::error::{Result, SpecialSitsError};

use crate::ports::{Embedder, Generator};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI embedder implementation
pub struct OpenAiEmbedder {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL (for proxies and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingsRequest {
            model: self.model.clone(),
            input: texts.iter().map(|t| (*t).to_string()).collect(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpecialSitsError::EmbedderUnavailable {
                reason: format!("Failed to reach OpenAI: {}", e),
                remediation: "Check network connectivity and OPENAI_API_KEY".to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpecialSitsError::EmbedderUnavailable {
                reason: format!("OpenAI API error ({}): {}", status, error_text),
                remediation: "Verify the API key and embedding model name".to_string(),
            });
        }

        let body: EmbeddingsResponse =
            response.json().await.map_err(|e| SpecialSitsError::EmbedderUnavailable {
                reason: format!("Failed to parse OpenAI response: {}", e),
                remediation: "Check OpenAI API compatibility".to_string(),
            })?;

        // The API may reorder entries; `index` restores input order.
        let mut data = body.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// OpenAI chat-completions generator implementation
pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL (for proxies and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpecialSitsError::LlmUnavailable {
                reason: format!("Failed to reach OpenAI: {}", e),
                remediation: "Check network connectivity and OPENAI_API_KEY".to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpecialSitsError::LlmUnavailable {
                reason: format!("OpenAI API error ({}): {}", status, error_text),
                remediation: "Verify the API key and chat model name".to_string(),
            });
        }

        let body: ChatResponse =
            response.json().await.map_err(|e| SpecialSitsError::LlmUnavailable {
                reason: format!("Failed to parse OpenAI response: {}", e),
                remediation: "Check OpenAI API compatibility".to_string(),
            })?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SpecialSitsError::LlmUnavailable {
                reason: "OpenAI returned no choices".to_string(),
                remediation: "Retry the request".to_string(),
            })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for the embeddings endpoint
#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// Request body for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedder_creation() {
        let embedder = OpenAiEmbedder::new("sk-test", "text-embedding-3-small");
        assert_eq!(embedder.model_name(), "text-embedding-3-small");
        assert_eq!(embedder.base_url, OPENAI_BASE_URL);
    }

    #[test]
    fn generator_base_url_override() {
        let generator = OpenAiGenerator::new("sk-test", "gpt-4o-mini")
            .with_base_url("http://localhost:9999/v1");
        assert_eq!(generator.base_url, "http://localhost:9999/v1");
        assert_eq!(generator.model_name(), "gpt-4o-mini");
    }
}
