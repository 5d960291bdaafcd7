use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecialSitsError;

/// The two filing datasets served by this system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Oddlots,
    Spinoffs,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Oddlots, Dataset::Spinoffs];

    /// Directory under the base data path holding this dataset
    pub fn dir_name(&self) -> &'static str {
        match self {
            Dataset::Oddlots => "db_oddlots",
            Dataset::Spinoffs => "db_spinoffs",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Oddlots => write!(f, "oddlots"),
            Dataset::Spinoffs => write!(f, "spinoffs"),
        }
    }
}

impl FromStr for Dataset {
    type Err = SpecialSitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oddlots" => Ok(Dataset::Oddlots),
            "spinoffs" => Ok(Dataset::Spinoffs),
            other => Err(SpecialSitsError::InvalidDataset { name: other.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_datasets() {
        assert_eq!("oddlots".parse::<Dataset>().unwrap(), Dataset::Oddlots);
        assert_eq!("spinoffs".parse::<Dataset>().unwrap(), Dataset::Spinoffs);
    }

    #[test]
    fn rejects_unknown_dataset() {
        let err = "oddities".parse::<Dataset>().unwrap_err();
        assert!(matches!(err, SpecialSitsError::InvalidDataset { name } if name == "oddities"));
    }

    #[test]
    fn dir_names() {
        assert_eq!(Dataset::Oddlots.dir_name(), "db_oddlots");
        assert_eq!(Dataset::Spinoffs.dir_name(), "db_spinoffs");
    }
}
