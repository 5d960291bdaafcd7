//! Status command implementation

use anyhow::Result;
use serde::Serialize;
use specialsits_core::config::Settings;
use specialsits_core::error::SpecialSitsError;
use specialsits_core::models::mapper::load_mapper;
use specialsits_core::models::Dataset;
use tabled::Tabled;

use crate::cli::StatusArgs;
use crate::output::OutputWriter;

#[derive(Debug, Serialize, Tabled)]
struct TickerRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Filings")]
    filings: usize,
    #[tabled(rename = "Latest")]
    latest: String,
}

#[derive(Debug, Serialize)]
struct DatasetStatus {
    dataset: Dataset,
    total_files: usize,
    tickers: Vec<TickerRow>,
}

pub async fn execute(args: StatusArgs, output: &OutputWriter) -> Result<()> {
    let settings = Settings::from_env();

    let datasets: Vec<Dataset> = match &args.dataset {
        Some(name) => vec![name.parse()?],
        None => Dataset::ALL.to_vec(),
    };

    let mut statuses = Vec::new();
    for dataset in datasets {
        match dataset_status(&settings, dataset) {
            Ok(status) => statuses.push(status),
            Err(SpecialSitsError::MapperNotFound { path }) => {
                output.warning(format!("{}: no mapper file at {}", dataset, path.display()));
            }
            Err(err) => return Err(err.into()),
        }
    }

    if output.is_json() {
        return output.result(&statuses);
    }

    for status in statuses {
        output.section(format!("Dataset: {}", status.dataset));
        output.kv("Tracked filings", status.total_files);
        output.table(status.tickers);
    }
    Ok(())
}

fn dataset_status(
    settings: &Settings,
    dataset: Dataset,
) -> std::result::Result<DatasetStatus, SpecialSitsError> {
    let mapper = load_mapper(&settings.base_path, dataset)?;

    let tickers = mapper
        .iter()
        .map(|(ticker, record)| TickerRow {
            ticker: ticker.clone(),
            filings: record.num_filings(),
            latest: record.latest_filing_date().unwrap_or("-").to_string(),
        })
        .collect();

    Ok(DatasetStatus { dataset, total_files: mapper.len(), tickers })
}
