//! Error types for SpecialSits

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecialSitsError {
    // Dataset errors
    #[error("Unknown dataset: {name}. Expected 'oddlots' or 'spinoffs'")]
    InvalidDataset { name: String },

    #[error("Mapper file not found at {}", .path.display())]
    MapperNotFound { path: PathBuf },

    #[error("Ticker {ticker} not found in {dataset}")]
    TickerNotFound { ticker: String, dataset: String },

    // Index errors
    #[error("Index not built for this run")]
    IndexNotBuilt,

    // Embedder errors
    #[error("Embedder unavailable: {reason}. Try: {remediation}")]
    EmbedderUnavailable { reason: String, remediation: String },

    // Language model errors
    #[error("Language model unavailable: {reason}. Try: {remediation}")]
    LlmUnavailable { reason: String, remediation: String },

    // Structured output errors
    #[error("Failed to parse field '{field}': {reason}")]
    ParseFailure { field: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SpecialSitsError {
    fn from(err: serde_json::Error) -> Self {
        SpecialSitsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpecialSitsError>;
