//! tunetag-lf library - Label Filter module
//!
//! Finds the songs of a library that carry every label in a selection.
//! SUPER labels in the selection are expanded to their REGULAR components
//! before matching.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod expander;
pub mod fixture;
pub mod index;
pub mod store;

pub use engine::{FilterResult, FilteringEngine};
pub use error::FilterError;
pub use store::{LabelStore, SqliteLabelStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LabelStore>,
    pub engine: FilteringEngine,
}

impl AppState {
    /// Create new application state over a label store
    pub fn new(store: Arc<dyn LabelStore>) -> Self {
        Self {
            engine: FilteringEngine::new(store.clone()),
            store,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/health", get(api::health_check))
        .route("/api/libraries/:library_id/filter", post(api::filter_songs))
        .route("/api/libraries/:library_id/labels", get(api::list_labels))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
