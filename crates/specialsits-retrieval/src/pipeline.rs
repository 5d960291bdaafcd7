//! Extraction run orchestrator

use std::collections::BTreeMap;
use std::sync::Arc;

use specialsits_core::error::{Result, SpecialSitsError};
use specialsits_core::models::Document;
use specialsits_core::processing::TextSplitter;
use specialsits_llm::{Embedder, Generator};
use specialsits_store::memory::{MemoryDocumentStore, MemoryVectorStore};
use specialsits_store::ports::{DocumentStore, VectorStore};

use crate::index::{IndexBuilder, Retriever};
use crate::parser::{ExtractionResult, ExtractionSchema, FieldOutcome, OutputParser};
use crate::prompt;

/// Lifecycle of one extraction run. `Failed` is reachable from any state;
/// there is no resumption, a new pipeline starts over from `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    DocumentsLoaded,
    Chunked,
    Indexed,
    Retrieving,
    Answering,
    Done,
    Failed,
}

/// How context is assembled for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Feed the entire concatenated document set into the prompt
    WholeDocument,
    /// Feed only the top-k chunks nearest to the query
    TopK(usize),
}

/// How a multi-field schema is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// One retrieval + one LLM call per field; failures stay per-field
    Isolated,
    /// One retrieval + one LLM call for the whole schema; a malformed
    /// response invalidates the whole record
    Joint,
}

/// One isolated-mode request: a field key, its question, and its parser
#[derive(Debug, Clone)]
pub struct Question {
    pub key: String,
    pub query: String,
    pub parser: OutputParser,
}

/// Per-run index handles. Built lazily on first retrieval and kept for the
/// remaining lifetime of the owning pipeline; never shared across runs.
struct RunIndex {
    document_store: Arc<dyn DocumentStore>,
    vector_store: Arc<dyn VectorStore>,
}

/// Orchestrates loading → chunking → indexing → retrieval → answering for one
/// batch of documents. Not safe to share across concurrent runs; each run
/// constructs its own pipeline.
pub struct RagPipeline {
    documents: Vec<Document>,
    splitter: TextSplitter,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    contextual_enrichment: bool,
    index: Option<RunIndex>,
    state: RunState,
}

impl RagPipeline {
    pub fn new(
        documents: Vec<Document>,
        splitter: TextSplitter,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let state =
            if documents.is_empty() { RunState::NotStarted } else { RunState::DocumentsLoaded };
        Self {
            documents,
            splitter,
            embedder,
            generator,
            contextual_enrichment: false,
            index: None,
            state,
        }
    }

    /// Enable the pre-indexing enrichment pass: each chunk gets a short
    /// LLM-generated context line derived from a whole-document summary.
    /// Improves retrieval relevance at extra LLM cost.
    pub fn with_contextual_enrichment(mut self, enabled: bool) -> Self {
        self.contextual_enrichment = enabled;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Free-form ask: the LLM's raw text response, unmodified.
    pub async fn ask(&mut self, question: &str, mode: RetrievalMode) -> Result<String> {
        match self.ask_inner(question, mode).await {
            Ok(answer) => {
                self.state = RunState::Done;
                Ok(answer)
            }
            Err(err) => {
                self.state = RunState::Failed;
                Err(err)
            }
        }
    }

    /// Isolated-mode extraction: one retrieval + one LLM call per question.
    /// A parse failure is recorded for its field only; an LLM or embedding
    /// failure is fatal to the run.
    pub async fn extract_isolated(
        &mut self,
        questions: &[Question],
        mode: RetrievalMode,
    ) -> Result<ExtractionResult> {
        match self.extract_isolated_inner(questions, mode).await {
            Ok(result) => {
                self.state = RunState::Done;
                Ok(result)
            }
            Err(err) => {
                self.state = RunState::Failed;
                Err(err)
            }
        }
    }

    /// Joint-mode extraction: one retrieval + one LLM call covering the whole
    /// schema. A malformed response invalidates the whole record.
    pub async fn extract_joint(
        &mut self,
        schema: &ExtractionSchema,
        mode: RetrievalMode,
    ) -> Result<BTreeMap<String, String>> {
        match self.extract_joint_inner(schema, mode).await {
            Ok(record) => {
                self.state = RunState::Done;
                Ok(record)
            }
            Err(err) => {
                self.state = RunState::Failed;
                Err(err)
            }
        }
    }

    async fn ask_inner(&mut self, question: &str, mode: RetrievalMode) -> Result<String> {
        let context = self.context_for(question, mode).await?;
        self.state = RunState::Answering;
        let prompt = prompt::qa_prompt(None, question, &context);
        self.generator.generate(&prompt).await
    }

    async fn extract_isolated_inner(
        &mut self,
        questions: &[Question],
        mode: RetrievalMode,
    ) -> Result<ExtractionResult> {
        let mut result = ExtractionResult::new();

        for question in questions {
            let context = self.context_for(&question.query, mode).await?;
            self.state = RunState::Answering;

            let instructions = question.parser.format_instructions();
            let prompt = prompt::qa_prompt(instructions.as_deref(), &question.query, &context);
            let raw = self.generator.generate(&prompt).await?;

            let outcome = match question.parser.parse(&raw) {
                Ok(value) => FieldOutcome::Parsed { value },
                Err(err) => {
                    tracing::warn!(field = %question.key, error = %err, "Field parse failed");
                    FieldOutcome::Failed { reason: err.to_string() }
                }
            };
            result.insert(question.key.clone(), outcome);
        }

        Ok(result)
    }

    async fn extract_joint_inner(
        &mut self,
        schema: &ExtractionSchema,
        mode: RetrievalMode,
    ) -> Result<BTreeMap<String, String>> {
        // In retrieval mode the schema's own formatting instructions serve as
        // the pseudo-query.
        let instructions = schema.format_instructions();
        let context = self.context_for(&instructions, mode).await?;
        self.state = RunState::Answering;

        let query = "Extract the requested fields from the filing.";
        let prompt = prompt::qa_prompt(Some(&instructions), query, &context);
        let raw = self.generator.generate(&prompt).await?;

        match OutputParser::Structured(schema.clone()).parse(&raw)? {
            crate::parser::FieldValue::Record(record) => Ok(record),
            _ => unreachable!("structured parser always yields a record"),
        }
    }

    /// Assemble prompt context for a query under the given retrieval mode.
    async fn context_for(&mut self, query: &str, mode: RetrievalMode) -> Result<String> {
        match mode {
            RetrievalMode::WholeDocument => {
                let combined: Vec<&str> =
                    self.documents.iter().map(|d| d.content.as_str()).collect();
                Ok(combined.join("\n\n"))
            }
            RetrievalMode::TopK(k) => {
                self.ensure_index().await?;
                self.state = RunState::Retrieving;

                let index = self.index.as_ref().ok_or(SpecialSitsError::IndexNotBuilt)?;
                let retriever = Retriever::new(
                    Arc::clone(&index.document_store),
                    Arc::clone(&index.vector_store),
                    Arc::clone(&self.embedder),
                );
                let chunks = retriever.retrieve(query, k).await?;
                let combined: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
                Ok(combined.join("\n\n"))
            }
        }
    }

    /// Build the per-run index on first use (check-then-set memoization).
    async fn ensure_index(&mut self) -> Result<()> {
        if self.index.is_some() {
            return Ok(());
        }

        let mut chunks = self.splitter.split(&self.documents);
        self.state = RunState::Chunked;
        tracing::debug!(documents = self.documents.len(), chunks = chunks.len(), "Split documents");

        if self.contextual_enrichment {
            chunks = self.enrich_chunks(chunks).await?;
        }

        let document_store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let vector_store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());

        let builder = IndexBuilder::new(
            Arc::clone(&document_store),
            Arc::clone(&vector_store),
            Arc::clone(&self.embedder),
        );
        builder.build(&chunks).await?;

        self.index = Some(RunIndex { document_store, vector_store });
        self.state = RunState::Indexed;
        Ok(())
    }

    /// Prepend an LLM-generated context line to each chunk before indexing.
    async fn enrich_chunks(
        &self,
        chunks: Vec<specialsits_core::models::Chunk>,
    ) -> Result<Vec<specialsits_core::models::Chunk>> {
        let combined: Vec<&str> = self.documents.iter().map(|d| d.content.as_str()).collect();
        let summary = self.generator.generate(&prompt::summary_prompt(&combined.join("\n\n"))).await?;

        let mut enriched = Vec::with_capacity(chunks.len());
        for mut chunk in chunks {
            let context = self
                .generator
                .generate(&prompt::chunk_context_prompt(&summary, &chunk.content))
                .await?;
            chunk.content = format!("{}\n\n{}", context, chunk.content);
            enriched.push(chunk);
        }
        Ok(enriched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oddlot::{oddlot_questions, oddlot_schema};
    use crate::parser::FieldValue;
    use async_trait::async_trait;

    /// Deterministic embedder, the temperature-0 analogue for vectors.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|text| {
                    let mut vector = vec![0.0f32; 8];
                    for (i, byte) in text.bytes().enumerate() {
                        vector[i % 8] += byte as f32 / 255.0;
                    }
                    vector
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "stub-embed"
        }
    }

    const RECORD_JSON: &str = r#"{
        "lower_price": "10.00",
        "lower_price_currency": "USD",
        "higher_price": "12.00",
        "higher_price_currency": "USD",
        "oddlot_priority": "True",
        "shareholder_requirements": "Fewer than 100 shares",
        "risks": "Offer may be withdrawn",
        "regulatory_approvals": "None",
        "tax_consequences": "Capital gains treatment"
    }"#;

    /// Deterministic generator: canned responses keyed on the prompt shape.
    struct StubGenerator;

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if prompt.contains("ISO 8601") {
                Ok("2024-05-01T00:00:00".to_string())
            } else if prompt.contains("JSON object") {
                Ok(RECORD_JSON.to_string())
            } else {
                Ok(format!("echo: {}", prompt.lines().nth(2).unwrap_or("")))
            }
        }

        fn model_name(&self) -> &str {
            "stub-chat"
        }
    }

    /// Generator that mangles responses for the general-terms schema only.
    struct PartiallyBrokenGenerator;

    #[async_trait]
    impl Generator for PartiallyBrokenGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if prompt.contains("oddlot_priority") {
                Ok("I cannot answer that.".to_string())
            } else {
                StubGenerator.generate(prompt).await
            }
        }

        fn model_name(&self) -> &str {
            "stub-chat-broken"
        }
    }

    fn sample_documents() -> Vec<Document> {
        vec![Document::new(
            "MNST_offer.html",
            "Offer to purchase for cash all odd lots. The expiration date is May 1, 2024. \
             The purchase price is between $10.00 and $12.00 per share in USD. Odd lot \
             holders holding fewer than 100 shares have priority. The offer may be \
             withdrawn under certain conditions. Capital gains treatment applies.",
        )]
    }

    fn pipeline(generator: Arc<dyn Generator>) -> RagPipeline {
        RagPipeline::new(
            sample_documents(),
            TextSplitter::new(80, 10).unwrap(),
            Arc::new(StubEmbedder),
            generator,
        )
    }

    #[tokio::test]
    async fn ask_returns_raw_text_unmodified() {
        let mut pipeline = pipeline(Arc::new(StubGenerator));
        let answer =
            pipeline.ask("Summarize the offer", RetrievalMode::WholeDocument).await.unwrap();
        assert!(answer.starts_with("echo: "));
        assert_eq!(pipeline.state(), RunState::Done);
    }

    #[tokio::test]
    async fn isolated_extraction_parses_every_field() {
        let mut pipeline = pipeline(Arc::new(StubGenerator));
        let result = pipeline
            .extract_isolated(&oddlot_questions(), RetrievalMode::TopK(3))
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        assert!(result.values().all(|o| o.is_parsed()));

        let FieldOutcome::Parsed { value: FieldValue::Datetime(dt) } = &result["expiration_date"]
        else {
            panic!("expected parsed datetime")
        };
        assert_eq!(dt.date().to_string(), "2024-05-01");
    }

    #[tokio::test]
    async fn joint_and_isolated_agree_on_shared_fields() {
        let mut isolated = pipeline(Arc::new(StubGenerator));
        let isolated_result = isolated
            .extract_isolated(&oddlot_questions(), RetrievalMode::TopK(3))
            .await
            .unwrap();

        let mut joint = pipeline(Arc::new(StubGenerator));
        let joint_record =
            joint.extract_joint(&oddlot_schema(), RetrievalMode::TopK(3)).await.unwrap();

        let FieldOutcome::Parsed { value: FieldValue::Record(price) } = &isolated_result["price"]
        else {
            panic!("expected parsed price record")
        };
        assert_eq!(price["lower_price"], joint_record["lower_price"]);
        assert_eq!(price["higher_price"], joint_record["higher_price"]);
    }

    #[tokio::test]
    async fn parse_failure_is_isolated_to_its_field() {
        let mut pipeline = pipeline(Arc::new(PartiallyBrokenGenerator));
        let result = pipeline
            .extract_isolated(&oddlot_questions(), RetrievalMode::TopK(3))
            .await
            .unwrap();

        assert!(result["expiration_date"].is_parsed());
        assert!(result["price"].is_parsed());
        assert!(matches!(result["general"], FieldOutcome::Failed { .. }));
        assert_eq!(pipeline.state(), RunState::Done);
    }

    #[tokio::test]
    async fn joint_mode_fails_whole_record_on_malformed_response() {
        let mut pipeline = pipeline(Arc::new(PartiallyBrokenGenerator));
        let err = pipeline
            .extract_joint(&oddlot_schema(), RetrievalMode::WholeDocument)
            .await
            .unwrap_err();
        assert!(matches!(err, SpecialSitsError::ParseFailure { .. }));
        assert_eq!(pipeline.state(), RunState::Failed);
    }

    #[tokio::test]
    async fn embedder_outage_fails_the_run() {
        struct DownEmbedder;

        #[async_trait]
        impl Embedder for DownEmbedder {
            async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
                Err(SpecialSitsError::EmbedderUnavailable {
                    reason: "connection refused".to_string(),
                    remediation: "start the embedding service".to_string(),
                })
            }

            fn model_name(&self) -> &str {
                "down-embed"
            }
        }

        let mut pipeline = RagPipeline::new(
            sample_documents(),
            TextSplitter::default(),
            Arc::new(DownEmbedder),
            Arc::new(StubGenerator),
        );

        let err = pipeline.ask("anything", RetrievalMode::TopK(2)).await.unwrap_err();
        assert!(matches!(err, SpecialSitsError::EmbedderUnavailable { .. }));
        assert_eq!(pipeline.state(), RunState::Failed);
    }

    #[tokio::test]
    async fn contextual_enrichment_prefixes_chunks() {
        struct ContextGenerator;

        #[async_trait]
        impl Generator for ContextGenerator {
            async fn generate(&self, prompt: &str) -> Result<String> {
                if prompt.starts_with("Summarize") {
                    Ok("An odd-lot tender offer.".to_string())
                } else if prompt.starts_with("Given the following summary") {
                    Ok("[context line]".to_string())
                } else {
                    Ok("answer".to_string())
                }
            }

            fn model_name(&self) -> &str {
                "stub-context"
            }
        }

        let mut pipeline = RagPipeline::new(
            sample_documents(),
            TextSplitter::new(80, 10).unwrap(),
            Arc::new(StubEmbedder),
            Arc::new(ContextGenerator),
        )
        .with_contextual_enrichment(true);

        pipeline.ask("What is offered?", RetrievalMode::TopK(2)).await.unwrap();

        let index = pipeline.index.as_ref().unwrap();
        let ids = index.document_store.list_chunk_ids().await.unwrap();
        let chunks = index.document_store.get_chunks(&ids).await.unwrap();
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.content.starts_with("[context line]")));
    }
}
