//! Error types for label filtering

use thiserror::Error;

/// Result type for filtering operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Reasons a label selection cannot be filtered
///
/// Raised at the earliest failing step; no partial result accompanies them.
#[derive(Debug, Error)]
pub enum FilterError {
    /// One or more requested label ids don't exist in the library
    #[error("Label(s) not found in library {library_id}: {}", .missing.join(", "))]
    LabelNotFound {
        library_id: String,
        missing: Vec<String>,
    },

    /// A selected SUPER label has no REGULAR components
    #[error("Super label '{name}' ({label_id}) has no components")]
    SuperLabelEmptyComponents { label_id: String, name: String },

    /// Storage failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] tunetag_common::Error),
}
