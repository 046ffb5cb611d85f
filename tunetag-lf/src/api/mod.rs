//! HTTP API handlers for tunetag-lf

pub mod error;
pub mod filter;
pub mod health;
pub mod labels;

pub use error::ApiError;
pub use filter::{filter_songs, FilterRequest};
pub use health::health_check;
pub use labels::list_labels;
