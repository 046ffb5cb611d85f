//! Label listing endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tunetag_common::db::Label;

use crate::api::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub library_id: String,
    pub labels: Vec<Label>,
}

/// GET /api/libraries/:library_id/labels
pub async fn list_labels(
    State(state): State<AppState>,
    Path(library_id): Path<String>,
) -> Result<Json<LabelsResponse>, ApiError> {
    let labels = state.store.find_all_labels(&library_id).await?;

    Ok(Json(LabelsResponse { library_id, labels }))
}
