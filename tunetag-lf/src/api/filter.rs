//! Label filter endpoint

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::ApiError;
use crate::engine::FilterResult;
use crate::AppState;

/// Request body for a filter call
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    /// Label ids to AND together; empty or absent means "all songs"
    #[serde(default)]
    pub label_ids: Vec<String>,
}

/// POST /api/libraries/:library_id/filter
///
/// Returns the songs carrying every REGULAR label the selection stands for.
pub async fn filter_songs(
    State(state): State<AppState>,
    Path(library_id): Path<String>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<FilterResult>, ApiError> {
    let Json(request) = body?;
    let result = state
        .engine
        .filter_songs_by_labels(&library_id, &request.label_ids)
        .await?;

    Ok(Json(result))
}
