use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use specialsits_core::models::Dataset;

use crate::dto::response::{RootSummary, TickerDetails};
use crate::error::ApiError;
use crate::services::summary;
use crate::state::AppState;

/// GET / - summaries for both datasets
pub async fn root_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RootSummary>, ApiError> {
    tracing::info!("Serving dataset summaries");

    let oddlots = summary::dataset_summary(&state.base_path, Dataset::Oddlots)?;
    let spinoffs = summary::dataset_summary(&state.base_path, Dataset::Spinoffs)?;

    Ok(Json(RootSummary { oddlots, spinoffs }))
}

/// GET /{dataset}/{ticker} - one ticker's detail record
pub async fn ticker_detail(
    State(state): State<Arc<AppState>>,
    Path((dataset, ticker)): Path<(String, String)>,
) -> Result<Json<TickerDetails>, ApiError> {
    // Validate the dataset name before touching the filesystem.
    let dataset: Dataset = dataset.parse()?;

    tracing::info!(%dataset, %ticker, "Serving ticker detail");

    let details = summary::ticker_details(&state.base_path, dataset, &ticker)?;
    Ok(Json(details))
}
