//! SpecialSits Core - Domain models, configuration, and document processing
//!
//! This crate contains the core domain logic shared by the extraction
//! pipeline, the HTTP API, and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod processing;

pub use error::{Result, SpecialSitsError};
