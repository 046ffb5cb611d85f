//! In-memory [`LabelStore`] for unit tests
//!
//! Records how often each read contract is called so tests can assert that
//! failing selections stop before any matching work.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tunetag_common::db::{Label, LabelKind, Song, SongLabel, SuperLabelComponent};
use tunetag_common::Result;

use super::LabelStore;

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub songs: Vec<Song>,
    pub labels: Vec<Label>,
    pub components: Vec<SuperLabelComponent>,
    pub edges: Vec<SongLabel>,
    pub edge_scans: AtomicUsize,
    pub song_fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn song(mut self, library_id: &str, song_id: &str) -> Self {
        self.songs.push(Song {
            song_id: song_id.to_string(),
            library_id: library_id.to_string(),
            title: format!("Title {}", song_id),
            artist: None,
            album: None,
            duration_ms: None,
        });
        self
    }

    pub fn label(mut self, library_id: &str, label_id: &str, kind: LabelKind) -> Self {
        self.labels.push(Label {
            label_id: label_id.to_string(),
            library_id: library_id.to_string(),
            name: format!("Name {}", label_id),
            kind,
        });
        self
    }

    pub fn component(mut self, library_id: &str, super_label_id: &str, regular_label_id: &str) -> Self {
        self.components.push(SuperLabelComponent {
            library_id: library_id.to_string(),
            super_label_id: super_label_id.to_string(),
            regular_label_id: regular_label_id.to_string(),
        });
        self
    }

    pub fn tag(mut self, library_id: &str, song_id: &str, label_id: &str) -> Self {
        self.edges.push(SongLabel {
            library_id: library_id.to_string(),
            song_id: song_id.to_string(),
            label_id: label_id.to_string(),
        });
        self
    }

    pub fn edge_scans(&self) -> usize {
        self.edge_scans.load(Ordering::SeqCst)
    }

    pub fn song_fetches(&self) -> usize {
        self.song_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LabelStore for MemoryStore {
    async fn find_labels_by_ids(&self, library_id: &str, label_ids: &[String]) -> Result<Vec<Label>> {
        Ok(self
            .labels
            .iter()
            .filter(|l| l.library_id == library_id && label_ids.contains(&l.label_id))
            .cloned()
            .collect())
    }

    async fn find_super_label_components(
        &self,
        library_id: &str,
        super_label_id: &str,
    ) -> Result<Vec<SuperLabelComponent>> {
        Ok(self
            .components
            .iter()
            .filter(|c| c.library_id == library_id && c.super_label_id == super_label_id)
            .cloned()
            .collect())
    }

    async fn find_song_label_edges_for_labels(
        &self,
        library_id: &str,
        label_ids: &[String],
    ) -> Result<Vec<SongLabel>> {
        self.edge_scans.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .edges
            .iter()
            .filter(|e| e.library_id == library_id && label_ids.contains(&e.label_id))
            .cloned()
            .collect())
    }

    async fn find_songs_by_ids(&self, library_id: &str, song_ids: &[String]) -> Result<Vec<Song>> {
        self.song_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .songs
            .iter()
            .filter(|s| s.library_id == library_id && song_ids.contains(&s.song_id))
            .cloned()
            .collect())
    }

    async fn find_all_songs(&self, library_id: &str) -> Result<Vec<Song>> {
        self.song_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .songs
            .iter()
            .filter(|s| s.library_id == library_id)
            .cloned()
            .collect())
    }

    async fn find_all_labels(&self, library_id: &str) -> Result<Vec<Label>> {
        Ok(self
            .labels
            .iter()
            .filter(|l| l.library_id == library_id)
            .cloned()
            .collect())
    }
}
