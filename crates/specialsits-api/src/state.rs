use std::path::PathBuf;

/// Shared handler state: the base data directory holding the dataset
/// subdirectories and their mapper files.
#[derive(Debug, Clone)]
pub struct AppState {
    pub base_path: PathBuf,
}

impl AppState {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }
}
