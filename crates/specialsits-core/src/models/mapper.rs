use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecialSitsError};
use crate::models::Dataset;

/// Per-ticker record in the `join_html_mapper.json` file.
///
/// The mapper is produced by the external ingestion process; this system only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingRecord {
    /// Source URLs of the downloaded filings
    pub urls: Vec<String>,

    /// Filing dates, ISO `YYYY-MM-DD` strings
    pub dates_filing: Vec<String>,

    /// SEC filing accession numbers
    pub nums_filing: Vec<String>,
}

impl FilingRecord {
    /// Number of filings recorded for this ticker
    pub fn num_filings(&self) -> usize {
        self.urls.len()
    }

    /// Most recent filing date, if any. ISO dates sort lexicographically.
    pub fn latest_filing_date(&self) -> Option<&str> {
        self.dates_filing.iter().max().map(String::as_str)
    }
}

/// Ticker symbol -> filing record mapping for one dataset
pub type FilingMapper = BTreeMap<String, FilingRecord>;

/// Load the mapper file for a dataset from the base data directory.
pub fn load_mapper(base_path: &Path, dataset: Dataset) -> Result<FilingMapper> {
    let path = base_path.join(dataset.dir_name()).join("join_html_mapper.json");

    if !path.exists() {
        return Err(SpecialSitsError::MapperNotFound { path });
    }

    let raw = std::fs::read_to_string(&path)?;
    let mapper = serde_json::from_str(&raw)?;
    Ok(mapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_mapper(dir: &Path, dataset: Dataset, body: &str) {
        let db_dir = dir.join(dataset.dir_name());
        fs::create_dir_all(&db_dir).unwrap();
        fs::write(db_dir.join("join_html_mapper.json"), body).unwrap();
    }

    #[test]
    fn loads_mapper_file() {
        let dir = tempfile::tempdir().unwrap();
        write_mapper(
            dir.path(),
            Dataset::Oddlots,
            r#"{"ABC": {"urls": ["u1"], "dates_filing": ["2024-01-01"], "nums_filing": ["1"]}}"#,
        );

        let mapper = load_mapper(dir.path(), Dataset::Oddlots).unwrap();
        assert_eq!(mapper.len(), 1);

        let record = &mapper["ABC"];
        assert_eq!(record.num_filings(), 1);
        assert_eq!(record.latest_filing_date(), Some("2024-01-01"));
    }

    #[test]
    fn missing_mapper_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_mapper(dir.path(), Dataset::Spinoffs).unwrap_err();
        assert!(matches!(err, SpecialSitsError::MapperNotFound { .. }));
    }

    #[test]
    fn malformed_mapper_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        write_mapper(dir.path(), Dataset::Oddlots, "not json");
        let err = load_mapper(dir.path(), Dataset::Oddlots).unwrap_err();
        assert!(matches!(err, SpecialSitsError::Serialization(_)));
    }

    #[test]
    fn latest_filing_date_picks_max() {
        let record = FilingRecord {
            urls: vec!["u1".into(), "u2".into()],
            dates_filing: vec!["2023-05-01".into(), "2024-02-10".into()],
            nums_filing: vec!["1".into(), "2".into()],
        };
        assert_eq!(record.latest_filing_date(), Some("2024-02-10"));
    }
}
