//! Read contracts the filtering engine consumes
//!
//! Every method is scoped by `library_id`; implementations must never return
//! rows belonging to another library.

use async_trait::async_trait;
use tunetag_common::db::{Label, Song, SongLabel, SuperLabelComponent};
use tunetag_common::Result;

pub mod sqlite;

#[cfg(test)]
pub(crate) mod memory;

pub use sqlite::SqliteLabelStore;

/// Storage backend for libraries, labels and label edges
#[async_trait]
pub trait LabelStore: Send + Sync {
    /// Labels in the library whose id is any of `label_ids`
    async fn find_labels_by_ids(&self, library_id: &str, label_ids: &[String]) -> Result<Vec<Label>>;

    /// Component edges of one SUPER label
    async fn find_super_label_components(
        &self,
        library_id: &str,
        super_label_id: &str,
    ) -> Result<Vec<SuperLabelComponent>>;

    /// Song-label edges whose label is any of `label_ids`
    async fn find_song_label_edges_for_labels(
        &self,
        library_id: &str,
        label_ids: &[String],
    ) -> Result<Vec<SongLabel>>;

    /// Songs in the library whose id is any of `song_ids`
    async fn find_songs_by_ids(&self, library_id: &str, song_ids: &[String]) -> Result<Vec<Song>>;

    /// Every song in the library
    async fn find_all_songs(&self, library_id: &str) -> Result<Vec<Song>>;

    /// Every label in the library
    async fn find_all_labels(&self, library_id: &str) -> Result<Vec<Label>>;
}
