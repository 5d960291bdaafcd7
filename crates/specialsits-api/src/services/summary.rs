//! Read-side services over the mapper files

use std::path::Path;

use specialsits_core::error::{Result, SpecialSitsError};
use specialsits_core::models::mapper::load_mapper;
use specialsits_core::models::Dataset;

use crate::dto::response::{DatasetSummary, TickerDetails, TickerInfo};

/// Build the summary for one dataset from its mapper file.
pub fn dataset_summary(base_path: &Path, dataset: Dataset) -> Result<DatasetSummary> {
    let mapper = load_mapper(base_path, dataset)?;

    let tickers = mapper
        .iter()
        .map(|(ticker, record)| TickerInfo {
            ticker: ticker.clone(),
            num_filings: record.num_filings(),
            latest_filing_date: record.latest_filing_date().unwrap_or_default().to_string(),
            filing_numbers: record.nums_filing.clone(),
        })
        .collect();

    Ok(DatasetSummary { total_files: mapper.len(), tickers })
}

/// Look up one ticker's detail record.
pub fn ticker_details(base_path: &Path, dataset: Dataset, ticker: &str) -> Result<TickerDetails> {
    let mut mapper = load_mapper(base_path, dataset)?;

    let details = mapper.remove(ticker).ok_or_else(|| SpecialSitsError::TickerNotFound {
        ticker: ticker.to_string(),
        dataset: dataset.to_string(),
    })?;

    Ok(TickerDetails { dataset, ticker: ticker.to_string(), details })
}
