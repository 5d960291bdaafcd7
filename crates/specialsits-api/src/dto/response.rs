use serde::{Deserialize, Serialize};
use specialsits_core::models::{Dataset, FilingRecord};

/// Per-ticker summary row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerInfo {
    pub ticker: String,
    pub num_filings: usize,
    pub latest_filing_date: String,
    pub filing_numbers: Vec<String>,
}

/// Summary of one dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_files: usize,
    pub tickers: Vec<TickerInfo>,
}

/// Root response: summaries for both datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootSummary {
    pub oddlots: DatasetSummary,
    pub spinoffs: DatasetSummary,
}

/// Detail record for one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerDetails {
    pub dataset: Dataset,
    pub ticker: String,
    pub details: FilingRecord,
}
