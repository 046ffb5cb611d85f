//! HTTP error mapping
//!
//! `LabelNotFound` → 404, `SuperLabelEmptyComponents` → 400, storage → 500.
//! Unreadable request bodies keep the extractor's status.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::FilterError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Common(#[from] tunetag_common::Error),

    #[error("Invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_code, missing) = match self {
            ApiError::Filter(FilterError::LabelNotFound { missing, .. }) => {
                (StatusCode::NOT_FOUND, "LABEL_NOT_FOUND", Some(missing))
            }
            ApiError::Filter(FilterError::SuperLabelEmptyComponents { .. }) => {
                (StatusCode::BAD_REQUEST, "SUPER_LABEL_EMPTY_COMPONENTS", None)
            }
            ApiError::Filter(FilterError::Store(err)) | ApiError::Common(err) => {
                error!("Storage failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
            ApiError::InvalidBody(rejection) => (rejection.status(), "INVALID_REQUEST", None),
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });
        if let Some(missing) = missing {
            body["error"]["missing_label_ids"] = json!(missing);
        }

        (status, Json(body)).into_response()
    }
}
