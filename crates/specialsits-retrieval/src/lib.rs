//! SpecialSits Retrieval - RAG pipeline over SEC filing documents
//!
//! This crate implements the extraction use cases: index building, retrieval,
//! prompt construction, structured-output parsing, and the run orchestrator.

pub mod index;
pub mod oddlot;
pub mod parser;
pub mod pipeline;
pub mod prompt;

pub use index::{IndexBuildResult, IndexBuilder, Retriever};
pub use oddlot::{general_schema, oddlot_questions, oddlot_schema, price_schema};
pub use parser::{
    ExtractionResult, ExtractionSchema, FieldOutcome, FieldSpec, FieldValue, OutputParser,
};
pub use pipeline::{ExtractionMode, Question, RagPipeline, RetrievalMode, RunState};
