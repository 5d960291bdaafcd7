//! Extract command implementation

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use specialsits_core::config::Settings;
use specialsits_core::models::Dataset;
use specialsits_retrieval::{oddlot_questions, oddlot_schema, ExtractionResult, FieldOutcome, FieldValue};
use tabled::Tabled;

use crate::cli::{ExtractArgs, ExtractionModeArg};
use crate::output::OutputWriter;
use crate::progress;
use crate::session;

/// Serializable summary of one extraction run
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExtractionReport {
    Isolated { dataset: Dataset, documents: usize, fields: ExtractionResult },
    Joint { dataset: Dataset, documents: usize, record: BTreeMap<String, String> },
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub async fn execute(args: ExtractArgs, output: &OutputWriter) -> Result<()> {
    let settings = Settings::from_env();

    let spinner = (!output.is_json()).then(|| progress::create_spinner("Running extraction..."));
    let result = run(&args, &settings).await;

    if let Some(pb) = spinner {
        match &result {
            Ok(_) => progress::finish_success(&pb, "Extraction complete"),
            Err(_) => progress::finish_error(&pb, "Extraction failed"),
        }
    }

    render(&result?, output)
}

/// Run one extraction and return its report. Shared with the scheduler.
pub async fn run(args: &ExtractArgs, settings: &Settings) -> Result<ExtractionReport> {
    let dataset: Dataset = args.dataset.parse()?;

    let mut pipeline =
        session::prepare_pipeline(settings, dataset, args.filter.as_deref(), args.contextual)
            .await?;
    let documents = pipeline.documents().len();
    let mode = session::retrieval_mode(settings, args.whole_document, args.top_k);

    match args.mode {
        ExtractionModeArg::Isolated => {
            let fields = pipeline
                .extract_isolated(&oddlot_questions(), mode)
                .await
                .context("Extraction run failed")?;
            Ok(ExtractionReport::Isolated { dataset, documents, fields })
        }
        ExtractionModeArg::Joint => {
            let record = pipeline
                .extract_joint(&oddlot_schema(), mode)
                .await
                .context("Extraction run failed")?;
            Ok(ExtractionReport::Joint { dataset, documents, record })
        }
    }
}

fn render(report: &ExtractionReport, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        return output.result(report);
    }

    match report {
        ExtractionReport::Isolated { dataset, documents, fields } => {
            output.success(format!("Extracted {} fields from {} ({} filings)", fields.len(), dataset, documents));
            output.table(field_rows(fields));

            let failed = fields.values().filter(|o| !o.is_parsed()).count();
            if failed > 0 {
                output.warning(format!("{} field(s) failed to parse", failed));
            }
        }
        ExtractionReport::Joint { dataset, documents, record } => {
            output.success(format!("Extracted record from {} ({} filings)", dataset, documents));
            output.table(record_rows(record));
        }
    }
    Ok(())
}

fn field_rows(fields: &ExtractionResult) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    for (key, outcome) in fields {
        match outcome {
            FieldOutcome::Parsed { value: FieldValue::Record(record) } => {
                for (name, value) in record {
                    rows.push(FieldRow {
                        field: format!("{}.{}", key, name),
                        status: "parsed".to_string(),
                        value: value.clone(),
                    });
                }
            }
            FieldOutcome::Parsed { value: FieldValue::Datetime(dt) } => {
                rows.push(FieldRow {
                    field: key.clone(),
                    status: "parsed".to_string(),
                    value: dt.to_string(),
                });
            }
            FieldOutcome::Parsed { value: FieldValue::Text(text) } => {
                rows.push(FieldRow {
                    field: key.clone(),
                    status: "parsed".to_string(),
                    value: text.clone(),
                });
            }
            FieldOutcome::Failed { reason } => {
                rows.push(FieldRow {
                    field: key.clone(),
                    status: "failed".to_string(),
                    value: reason.clone(),
                });
            }
        }
    }
    rows
}

fn record_rows(record: &BTreeMap<String, String>) -> Vec<FieldRow> {
    record
        .iter()
        .map(|(name, value)| FieldRow {
            field: name.clone(),
            status: "parsed".to_string(),
            value: value.clone(),
        })
        .collect()
}
