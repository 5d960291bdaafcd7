//! Shared pipeline wiring for the extract, ask, and schedule commands.

use anyhow::{bail, Context, Result};
use specialsits_core::config::Settings;
use specialsits_core::models::Dataset;
use specialsits_core::processing::{DocumentLoader, TextSplitter};
use specialsits_llm::{build_embedder, build_generator};
use specialsits_retrieval::{RagPipeline, RetrievalMode};

/// Load a dataset's filings and assemble a ready-to-run pipeline.
pub async fn prepare_pipeline(
    settings: &Settings,
    dataset: Dataset,
    filter: Option<&str>,
    contextual: bool,
) -> Result<RagPipeline> {
    let html_dir = settings.base_path.join(dataset.dir_name()).join("html");
    if !html_dir.exists() {
        bail!(
            "No filing directory at {}. Set SPECIALSITS_BASE_PATH to the data directory.",
            html_dir.display()
        );
    }

    let loader = DocumentLoader::new(settings.load_workers);
    let documents = loader
        .load_dir_filtered(&html_dir, filter)
        .await
        .with_context(|| format!("Failed to load filings from {}", html_dir.display()))?;

    if documents.is_empty() {
        match filter {
            Some(substr) => bail!("No filings in {} match '{}'", html_dir.display(), substr),
            None => bail!("No filings found in {}", html_dir.display()),
        }
    }

    tracing::info!(
        dataset = %dataset,
        documents = documents.len(),
        "Loaded filings"
    );

    let splitter = TextSplitter::new(settings.chunk_size, settings.chunk_overlap)
        .context("Invalid chunking configuration")?;
    let embedder = build_embedder(settings)?;
    let generator = build_generator(settings)?;

    Ok(RagPipeline::new(documents, splitter, embedder, generator)
        .with_contextual_enrichment(contextual))
}

/// Resolve the retrieval mode from the shared CLI flags.
pub fn retrieval_mode(settings: &Settings, whole_document: bool, top_k: Option<usize>) -> RetrievalMode {
    if whole_document {
        RetrievalMode::WholeDocument
    } else {
        RetrievalMode::TopK(top_k.unwrap_or(settings.top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::from_env()
    }

    #[test]
    fn whole_document_flag_wins() {
        let mode = retrieval_mode(&settings(), true, Some(7));
        assert_eq!(mode, RetrievalMode::WholeDocument);
    }

    #[test]
    fn top_k_falls_back_to_settings() {
        let s = settings();
        assert_eq!(retrieval_mode(&s, false, None), RetrievalMode::TopK(s.top_k));
        assert_eq!(retrieval_mode(&s, false, Some(9)), RetrievalMode::TopK(9));
    }
}
