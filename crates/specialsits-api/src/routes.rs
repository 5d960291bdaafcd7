use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::root_summary))
        .route("/{dataset}/{ticker}", get(handlers::ticker_detail))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::fs;
    use std::path::Path;
    use tower::ServiceExt;

    fn write_mapper(base: &Path, dir_name: &str, body: &str) {
        let db_dir = base.join(dir_name);
        fs::create_dir_all(&db_dir).unwrap();
        fs::write(db_dir.join("join_html_mapper.json"), body).unwrap();
    }

    fn app_with_fixtures() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        write_mapper(
            dir.path(),
            "db_oddlots",
            r#"{
                "ABC": {
                    "urls": ["https://www.sec.gov/a1", "https://www.sec.gov/a2"],
                    "dates_filing": ["2024-01-01", "2024-03-15"],
                    "nums_filing": ["0001", "0002"]
                }
            }"#,
        );
        write_mapper(
            dir.path(),
            "db_spinoffs",
            r#"{
                "XYZ": {
                    "urls": ["https://www.sec.gov/x1"],
                    "dates_filing": ["2023-11-30"],
                    "nums_filing": ["0009"]
                }
            }"#,
        );

        let state = Arc::new(AppState { base_path: dir.path().to_path_buf() });
        let router = create_router(state);
        (dir, router)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response =
            router.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_dir, router) = app_with_fixtures();
        let (status, body) = get_json(router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn root_summarizes_both_datasets() {
        let (_dir, router) = app_with_fixtures();
        let (status, body) = get_json(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["oddlots"]["total_files"], 1);
        assert_eq!(body["spinoffs"]["total_files"], 1);

        let abc = &body["oddlots"]["tickers"][0];
        assert_eq!(abc["ticker"], "ABC");
        assert_eq!(abc["num_filings"], 2);
        assert_eq!(abc["latest_filing_date"], "2024-03-15");
    }

    #[tokio::test]
    async fn ticker_detail_returns_record() {
        let (_dir, router) = app_with_fixtures();
        let (status, body) = get_json(router, "/oddlots/ABC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dataset"], "oddlots");
        assert_eq!(body["ticker"], "ABC");
        assert_eq!(body["details"]["urls"].as_array().unwrap().len(), 2);
        assert_eq!(body["details"]["nums_filing"][1], "0002");
    }

    #[tokio::test]
    async fn unknown_dataset_is_rejected_before_lookup() {
        // No mapper files exist; an invalid dataset name must 400, not 404.
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState { base_path: dir.path().to_path_buf() });
        let router = create_router(state);

        let (status, body) = get_json(router, "/oddities/ABC").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("oddities"));
    }

    #[tokio::test]
    async fn unknown_ticker_is_404() {
        let (_dir, router) = app_with_fixtures();
        let (status, body) = get_json(router, "/oddlots/ZZZ").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("ZZZ"));
    }

    #[tokio::test]
    async fn missing_mapper_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState { base_path: dir.path().to_path_buf() });
        let router = create_router(state);

        let (status, _body) = get_json(router, "/spinoffs/XYZ").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
