//! Song-Label Index: exact AND-matching over song-label edges
//!
//! Matching counts edges per song. Storage keeps at most one edge per
//! (song, label) pair, so a song's count equals the number of distinct
//! required labels it carries.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::store::LabelStore;

#[derive(Clone)]
pub struct SongLabelIndex {
    store: Arc<dyn LabelStore>,
}

impl SongLabelIndex {
    pub fn new(store: Arc<dyn LabelStore>) -> Self {
        Self { store }
    }

    /// Ids of songs carrying every label in `required`
    ///
    /// An empty `required` set matches nothing here; the engine handles
    /// "no filter" before reaching the index.
    pub async fn songs_with_all_labels(
        &self,
        library_id: &str,
        required: &BTreeSet<String>,
    ) -> Result<HashSet<String>> {
        if required.is_empty() {
            return Ok(HashSet::new());
        }

        let label_ids: Vec<String> = required.iter().cloned().collect();
        let edges = self
            .store
            .find_song_label_edges_for_labels(library_id, &label_ids)
            .await?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for edge in edges {
            if required.contains(&edge.label_id) {
                *counts.entry(edge.song_id).or_insert(0) += 1;
            }
        }

        let matched: HashSet<String> = counts
            .into_iter()
            .filter(|(_, count)| *count == required.len())
            .map(|(song_id, _)| song_id)
            .collect();

        debug!(
            "{} songs carry all {} required labels in library {}",
            matched.len(),
            required.len(),
            library_id
        );
        Ok(matched)
    }
}
