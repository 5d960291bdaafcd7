use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use scraper::Html;

use crate::error::Result;
use crate::models::Document;

/// Loads SEC filing HTML files from a directory into normalized documents.
///
/// Parsing runs on a fixed-size blocking worker pool, one task per file, with
/// an order-preserving join. A file that cannot be read is logged and skipped;
/// the batch continues.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    workers: usize,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self { workers: 8 }
    }
}

impl DocumentLoader {
    pub fn new(workers: usize) -> Self {
        Self { workers: workers.max(1) }
    }

    /// Load every `.html`/`.htm` file in `dir`.
    pub async fn load_dir(&self, dir: &Path) -> Result<Vec<Document>> {
        self.load_dir_filtered(dir, None).await
    }

    /// Load markup files in `dir` whose file name contains `filter`.
    pub async fn load_dir_filtered(&self, dir: &Path, filter: Option<&str>) -> Result<Vec<Document>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_markup_file(path))
            .filter(|path| match filter {
                Some(substr) => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.contains(substr)),
                None => true,
            })
            .collect();
        paths.sort();

        let documents: Vec<Option<Document>> = stream::iter(paths)
            .map(|path| async move {
                let result = tokio::task::spawn_blocking(move || load_file(&path)).await;
                match result {
                    Ok(Ok(document)) => Some(document),
                    Ok(Err((path, err))) => {
                        tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable filing");
                        None
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Loader task failed");
                        None
                    }
                }
            })
            .buffered(self.workers)
            .collect()
            .await;

        Ok(documents.into_iter().flatten().collect())
    }
}

fn is_markup_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("html") | Some("htm")
    )
}

fn load_file(path: &Path) -> std::result::Result<Document, (PathBuf, std::io::Error)> {
    let raw = std::fs::read_to_string(path).map_err(|e| (path.to_path_buf(), e))?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(source, normalize_html(&raw)))
}

/// Strip markup tags and collapse whitespace runs to single spaces.
pub fn normalize_html(raw: &str) -> String {
    let parsed = Html::parse_document(raw);
    let text: Vec<&str> = parsed.root_element().text().collect();
    collapse_whitespace(&text.join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Offer to  Purchase</h1>\n<p>up to\n100 shares</p></body></html>";
        assert_eq!(normalize_html(html), "Offer to Purchase up to 100 shares");
    }

    #[tokio::test]
    async fn loads_only_markup_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_XYZ.html"), "<p>second</p>").unwrap();
        fs::write(dir.path().join("a_ABC.htm"), "<p>first</p>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let documents = DocumentLoader::new(4).load_dir(dir.path()).await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].source, "a_ABC.htm");
        assert_eq!(documents[0].content, "first");
        assert_eq!(documents[1].source, "b_XYZ.html");
        assert_eq!(documents[1].content, "second");
    }

    #[tokio::test]
    async fn filters_by_file_name_substring() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("MNST_offer.html"), "<p>match</p>").unwrap();
        fs::write(dir.path().join("ABC_offer.html"), "<p>other</p>").unwrap();

        let documents = DocumentLoader::default()
            .load_dir_filtered(dir.path(), Some("MNST"))
            .await
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].source, "MNST_offer.html");
    }

    #[tokio::test]
    async fn missing_directory_is_fatal() {
        let result = DocumentLoader::default()
            .load_dir(Path::new("/nonexistent/filings"))
            .await;
        assert!(result.is_err());
    }
}
