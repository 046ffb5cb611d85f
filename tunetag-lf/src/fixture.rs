//! JSON library fixtures
//!
//! Loads a complete library (songs, labels, SUPER components, tags) through
//! [`SqliteLabelStore`]'s write path, so fixture data obeys the same edge
//! invariants as any other write.

use serde::Deserialize;
use std::path::Path;
use tracing::info;
use tunetag_common::db::{Label, LabelKind, Library, Song};
use tunetag_common::{Error, Result};

use crate::store::{sqlite, SqliteLabelStore};

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryFixture {
    pub library_id: String,
    pub name: String,
    #[serde(default)]
    pub songs: Vec<SongFixture>,
    #[serde(default)]
    pub labels: Vec<LabelFixture>,
    #[serde(default)]
    pub tags: Vec<TagFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongFixture {
    pub song_id: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelFixture {
    pub label_id: String,
    pub name: String,
    pub kind: LabelKind,
    /// REGULAR component ids; SUPER labels only
    #[serde(default)]
    pub components: Vec<String>,
}

/// Labels carried by one song
#[derive(Debug, Clone, Deserialize)]
pub struct TagFixture {
    pub song_id: String,
    pub label_ids: Vec<String>,
}

/// Counts of rows written by [`LibraryFixture::apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureSummary {
    pub songs: usize,
    pub labels: usize,
    pub components: usize,
    pub tags: usize,
}

impl LibraryFixture {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("Invalid fixture: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the fixture into `store` as one transaction
    ///
    /// Labels are all created before any component or tag references them.
    /// A rejected row rolls back everything the fixture wrote.
    pub async fn apply(&self, store: &SqliteLabelStore) -> Result<FixtureSummary> {
        let mut summary = FixtureSummary::default();
        let mut tx = store.pool().begin().await?;

        sqlite::create_library(
            &mut tx,
            &Library {
                library_id: self.library_id.clone(),
                name: self.name.clone(),
            },
        )
        .await?;

        for song in &self.songs {
            sqlite::insert_song(
                &mut tx,
                &Song {
                    song_id: song.song_id.clone(),
                    library_id: self.library_id.clone(),
                    title: song.title.clone(),
                    artist: song.artist.clone(),
                    album: song.album.clone(),
                    duration_ms: song.duration_ms,
                },
            )
            .await?;
            summary.songs += 1;
        }

        for label in &self.labels {
            sqlite::insert_label(
                &mut tx,
                &Label {
                    label_id: label.label_id.clone(),
                    library_id: self.library_id.clone(),
                    name: label.name.clone(),
                    kind: label.kind,
                },
            )
            .await?;
            summary.labels += 1;
        }

        for label in &self.labels {
            for component in &label.components {
                if sqlite::add_super_label_component(&mut tx, &self.library_id, &label.label_id, component)
                    .await?
                {
                    summary.components += 1;
                }
            }
        }

        for tag in &self.tags {
            for label_id in &tag.label_ids {
                if sqlite::tag_song(&mut tx, &self.library_id, &tag.song_id, label_id).await? {
                    summary.tags += 1;
                }
            }
        }

        tx.commit().await?;

        info!(
            "Loaded library {}: {} songs, {} labels, {} components, {} tags",
            self.library_id, summary.songs, summary.labels, summary.components, summary.tags
        );
        Ok(summary)
    }
}
