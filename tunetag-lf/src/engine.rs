//! Filtering Engine: label selection in, matching songs out
//!
//! Pipeline: validate → expand → intersect → fetch. Each step reads
//! committed state on its own; the sequence as a whole is not a snapshot.
//! Any failing step aborts the rest.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use tunetag_common::db::Song;

use crate::catalog::LabelCatalog;
use crate::error::Result;
use crate::expander::SuperLabelExpander;
use crate::index::SongLabelIndex;
use crate::store::LabelStore;

/// Outcome of a filter request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    /// Label ids exactly as the caller supplied them
    pub input_label_ids: Vec<String>,
    /// REGULAR label ids every returned song carries (sorted, no duplicates)
    pub required_regular_label_ids: Vec<String>,
    /// Matching songs, ordered by title then id
    pub songs: Vec<Song>,
}

/// Stateless filtering entry point; cheap to clone and share across tasks
#[derive(Clone)]
pub struct FilteringEngine {
    store: Arc<dyn LabelStore>,
    catalog: LabelCatalog,
    expander: SuperLabelExpander,
    index: SongLabelIndex,
}

impl FilteringEngine {
    pub fn new(store: Arc<dyn LabelStore>) -> Self {
        Self {
            catalog: LabelCatalog::new(store.clone()),
            expander: SuperLabelExpander::new(store.clone()),
            index: SongLabelIndex::new(store.clone()),
            store,
        }
    }

    /// Songs in `library_id` carrying every REGULAR label `label_ids` stands for
    ///
    /// An empty selection returns the whole library.
    pub async fn filter_songs_by_labels(
        &self,
        library_id: &str,
        label_ids: &[String],
    ) -> Result<FilterResult> {
        if label_ids.is_empty() {
            return self.all_songs(library_id, label_ids).await;
        }

        let labels = self.catalog.validate_labels(library_id, label_ids).await?;
        let required = self.expander.expand(library_id, &labels).await?;

        if required.is_empty() {
            return self.all_songs(library_id, label_ids).await;
        }

        let matched = self.index.songs_with_all_labels(library_id, &required).await?;

        let songs = if matched.is_empty() {
            Vec::new()
        } else {
            let song_ids: Vec<String> = matched.into_iter().collect();
            self.store.find_songs_by_ids(library_id, &song_ids).await?
        };

        info!(
            "Filtered library {}: {} labels -> {} required -> {} songs",
            library_id,
            label_ids.len(),
            required.len(),
            songs.len()
        );

        Ok(FilterResult {
            input_label_ids: label_ids.to_vec(),
            required_regular_label_ids: required.into_iter().collect(),
            songs,
        })
    }

    async fn all_songs(&self, library_id: &str, label_ids: &[String]) -> Result<FilterResult> {
        let songs = self.store.find_all_songs(library_id).await?;
        debug!("No label filter for library {}, returning {} songs", library_id, songs.len());

        Ok(FilterResult {
            input_label_ids: label_ids.to_vec(),
            required_regular_label_ids: Vec::new(),
            songs,
        })
    }
}
