//! SQLite implementation of [`LabelStore`]
//!
//! Besides the read contracts, this store owns the write path for libraries,
//! songs, labels and label edges, and enforces the edge invariants there:
//! - a SUPER label's components are REGULAR labels (no nested composition)
//! - songs are tagged with REGULAR labels only
//! - at most one edge per (song, label) pair

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use tunetag_common::db::{Label, LabelKind, Library, Song, SongLabel, SuperLabelComponent};
use tunetag_common::{Error, Result};
use uuid::Uuid;

use super::LabelStore;

const SONG_COLUMNS: &str = "library_id, song_id, title, artist, album, duration_ms";
const LABEL_COLUMNS: &str = "library_id, label_id, name, kind";

/// Ids bound per `IN (...)` list; SQLite caps the bind variables of one statement
const MAX_IDS_PER_QUERY: usize = 500;

#[derive(Debug, Clone)]
pub struct SqliteLabelStore {
    pool: SqlitePool,
}

impl SqliteLabelStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a library (no-op if it already exists)
    pub async fn create_library(&self, library: &Library) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        create_library(&mut conn, library).await
    }

    /// Insert or update a song's display attributes
    pub async fn insert_song(&self, song: &Song) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        insert_song(&mut conn, song).await
    }

    /// Create a label with a generated id
    pub async fn create_label(&self, library_id: &str, name: &str, kind: LabelKind) -> Result<Label> {
        let label = Label {
            label_id: Uuid::new_v4().to_string(),
            library_id: library_id.to_string(),
            name: name.to_string(),
            kind,
        };
        self.insert_label(&label).await?;
        Ok(label)
    }

    /// Insert a label with a caller-chosen id
    ///
    /// Fails if the id is taken; an existing label's kind is never changed.
    pub async fn insert_label(&self, label: &Label) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        insert_label(&mut conn, label).await
    }

    /// Add a REGULAR component to a SUPER label
    ///
    /// Returns `false` if the component was already present.
    pub async fn add_super_label_component(
        &self,
        library_id: &str,
        super_label_id: &str,
        regular_label_id: &str,
    ) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        add_super_label_component(&mut conn, library_id, super_label_id, regular_label_id).await
    }

    /// Tag a song with a REGULAR label
    ///
    /// Idempotent: returns `false` if the song already carried the label.
    pub async fn tag_song(&self, library_id: &str, song_id: &str, label_id: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        tag_song(&mut conn, library_id, song_id, label_id).await
    }

    /// Remove a tag from a song; returns `false` if it wasn't there
    pub async fn untag_song(&self, library_id: &str, song_id: &str, label_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM song_labels WHERE library_id = ? AND song_id = ? AND label_id = ?",
        )
        .bind(library_id)
        .bind(song_id)
        .bind(label_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Write path on a single connection, so a caller holding a transaction can
// group several writes and roll them back together.

pub(crate) async fn create_library(conn: &mut SqliteConnection, library: &Library) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO libraries (library_id, name) VALUES (?, ?)")
        .bind(&library.library_id)
        .bind(&library.name)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub(crate) async fn insert_song(conn: &mut SqliteConnection, song: &Song) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO songs (library_id, song_id, title, artist, album, duration_ms)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(library_id, song_id) DO UPDATE SET
            title = excluded.title,
            artist = excluded.artist,
            album = excluded.album,
            duration_ms = excluded.duration_ms
        "#,
    )
    .bind(&song.library_id)
    .bind(&song.song_id)
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(song.duration_ms)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(crate) async fn insert_label(conn: &mut SqliteConnection, label: &Label) -> Result<()> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO labels (library_id, label_id, name, kind) VALUES (?, ?, ?, ?)",
    )
    .bind(&label.library_id)
    .bind(&label.label_id)
    .bind(&label.name)
    .bind(label.kind.as_str())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::InvalidInput(format!(
            "Label {} already exists in library {}",
            label.label_id, label.library_id
        )));
    }

    Ok(())
}

pub(crate) async fn add_super_label_component(
    conn: &mut SqliteConnection,
    library_id: &str,
    super_label_id: &str,
    regular_label_id: &str,
) -> Result<bool> {
    let super_label = require_label(conn, library_id, super_label_id).await?;
    let component = require_label(conn, library_id, regular_label_id).await?;

    if !super_label.is_super() {
        return Err(Error::InvalidInput(format!(
            "Label {} is not a super label",
            super_label_id
        )));
    }
    if component.is_super() {
        warn!(
            "Rejected nested composition: {} -> {} in library {}",
            super_label_id, regular_label_id, library_id
        );
        return Err(Error::InvalidInput(format!(
            "Component {} of super label {} must be a regular label",
            regular_label_id, super_label_id
        )));
    }

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO super_label_components (library_id, super_label_id, regular_label_id)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(library_id)
    .bind(super_label_id)
    .bind(regular_label_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn tag_song(
    conn: &mut SqliteConnection,
    library_id: &str,
    song_id: &str,
    label_id: &str,
) -> Result<bool> {
    let label = require_label(conn, library_id, label_id).await?;
    if label.is_super() {
        return Err(Error::InvalidInput(format!(
            "Cannot tag song {} with super label {}",
            song_id, label_id
        )));
    }

    let song_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM songs WHERE library_id = ? AND song_id = ?)",
    )
    .bind(library_id)
    .bind(song_id)
    .fetch_one(&mut *conn)
    .await?;
    if !song_exists {
        return Err(Error::NotFound(format!(
            "Song {} in library {}",
            song_id, library_id
        )));
    }

    let result = sqlx::query(
        "INSERT OR IGNORE INTO song_labels (library_id, song_id, label_id) VALUES (?, ?, ?)",
    )
    .bind(library_id)
    .bind(song_id)
    .bind(label_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn require_label(conn: &mut SqliteConnection, library_id: &str, label_id: &str) -> Result<Label> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM labels WHERE library_id = ? AND label_id = ?",
        LABEL_COLUMNS
    ))
    .bind(library_id)
    .bind(label_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => label_from_row(&row),
        None => Err(Error::NotFound(format!(
            "Label {} in library {}",
            label_id, library_id
        ))),
    }
}

#[async_trait]
impl LabelStore for SqliteLabelStore {
    async fn find_labels_by_ids(&self, library_id: &str, label_ids: &[String]) -> Result<Vec<Label>> {
        if label_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut labels = Vec::with_capacity(label_ids.len());
        for chunk in label_ids.chunks(MAX_IDS_PER_QUERY) {
            let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM labels WHERE library_id = ", LABEL_COLUMNS));
            qb.push_bind(library_id);
            qb.push(" AND label_id IN (");
            push_id_list(&mut qb, chunk);

            for row in qb.build().fetch_all(&self.pool).await? {
                labels.push(label_from_row(&row)?);
            }
        }

        Ok(labels)
    }

    async fn find_super_label_components(
        &self,
        library_id: &str,
        super_label_id: &str,
    ) -> Result<Vec<SuperLabelComponent>> {
        let rows = sqlx::query(
            r#"
            SELECT library_id, super_label_id, regular_label_id
            FROM super_label_components
            WHERE library_id = ? AND super_label_id = ?
            ORDER BY regular_label_id
            "#,
        )
        .bind(library_id)
        .bind(super_label_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| SuperLabelComponent {
                library_id: row.get("library_id"),
                super_label_id: row.get("super_label_id"),
                regular_label_id: row.get("regular_label_id"),
            })
            .collect())
    }

    async fn find_song_label_edges_for_labels(
        &self,
        library_id: &str,
        label_ids: &[String],
    ) -> Result<Vec<SongLabel>> {
        if label_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut edges = Vec::new();
        for chunk in label_ids.chunks(MAX_IDS_PER_QUERY) {
            let mut qb = QueryBuilder::<Sqlite>::new(
                "SELECT library_id, song_id, label_id FROM song_labels WHERE library_id = ",
            );
            qb.push_bind(library_id);
            qb.push(" AND label_id IN (");
            push_id_list(&mut qb, chunk);

            let rows = qb.build().fetch_all(&self.pool).await?;
            edges.extend(rows.iter().map(|row| SongLabel {
                library_id: row.get("library_id"),
                song_id: row.get("song_id"),
                label_id: row.get("label_id"),
            }));
        }
        debug!("Scanned {} song-label edges in library {}", edges.len(), library_id);

        Ok(edges)
    }

    async fn find_songs_by_ids(&self, library_id: &str, song_ids: &[String]) -> Result<Vec<Song>> {
        if song_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut songs = Vec::with_capacity(song_ids.len());
        for chunk in song_ids.chunks(MAX_IDS_PER_QUERY) {
            let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM songs WHERE library_id = ", SONG_COLUMNS));
            qb.push_bind(library_id);
            qb.push(" AND song_id IN (");
            push_id_list(&mut qb, chunk);

            let rows = qb.build().fetch_all(&self.pool).await?;
            songs.extend(rows.iter().map(song_from_row));
        }

        // Merge chunks into title, then id order
        songs.sort_by(|a, b| (&a.title, &a.song_id).cmp(&(&b.title, &b.song_id)));
        Ok(songs)
    }

    async fn find_all_songs(&self, library_id: &str) -> Result<Vec<Song>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM songs WHERE library_id = ? ORDER BY title, song_id",
            SONG_COLUMNS
        ))
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(song_from_row).collect())
    }

    async fn find_all_labels(&self, library_id: &str) -> Result<Vec<Label>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM labels WHERE library_id = ? ORDER BY kind, name, label_id",
            LABEL_COLUMNS
        ))
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(label_from_row).collect()
    }
}

/// Append `?, ?, ...)` binding every id
fn push_id_list<'a>(qb: &mut QueryBuilder<'a, Sqlite>, ids: &'a [String]) {
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");
}

fn song_from_row(row: &SqliteRow) -> Song {
    Song {
        song_id: row.get("song_id"),
        library_id: row.get("library_id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        duration_ms: row.get("duration_ms"),
    }
}

fn label_from_row(row: &SqliteRow) -> Result<Label> {
    let kind: String = row.get("kind");
    let label_id: String = row.get("label_id");
    let kind = kind
        .parse::<LabelKind>()
        .map_err(|e| Error::Internal(format!("Corrupt label {}: {}", label_id, e)))?;

    Ok(Label {
        label_id,
        library_id: row.get("library_id"),
        name: row.get("name"),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunetag_common::db::init_memory_database;

    async fn setup() -> SqliteLabelStore {
        let pool = init_memory_database().await.expect("Failed to create in-memory database");
        let store = SqliteLabelStore::new(pool);
        store.create_library(&library("lib1", "Home")).await.unwrap();
        store
            .insert_song(&Song {
                song_id: "S1".to_string(),
                library_id: "lib1".to_string(),
                title: "First".to_string(),
                artist: Some("Artist".to_string()),
                album: None,
                duration_ms: Some(180_000),
            })
            .await
            .unwrap();
        store
    }

    fn library(id: &str, name: &str) -> Library {
        Library {
            library_id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn label(id: &str, kind: LabelKind) -> Label {
        Label {
            label_id: id.to_string(),
            library_id: "lib1".to_string(),
            name: format!("Label {}", id),
            kind,
        }
    }

    #[tokio::test]
    async fn test_tag_song_is_idempotent() {
        let store = setup().await;
        store.insert_label(&label("R1", LabelKind::Regular)).await.unwrap();

        assert!(store.tag_song("lib1", "S1", "R1").await.unwrap());
        assert!(!store.tag_song("lib1", "S1", "R1").await.unwrap());

        let edges = store
            .find_song_label_edges_for_labels("lib1", &["R1".to_string()])
            .await
            .unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[tokio::test]
    async fn test_tag_song_with_super_label_rejected() {
        let store = setup().await;
        store.insert_label(&label("SA", LabelKind::Super)).await.unwrap();

        let result = store.tag_song("lib1", "S1", "SA").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_tag_unknown_song_is_not_found() {
        let store = setup().await;
        store.insert_label(&label("R1", LabelKind::Regular)).await.unwrap();

        let result = store.tag_song("lib1", "S404", "R1").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_nested_super_component_rejected() {
        let store = setup().await;
        store.insert_label(&label("SA", LabelKind::Super)).await.unwrap();
        store.insert_label(&label("SB", LabelKind::Super)).await.unwrap();

        let result = store.add_super_label_component("lib1", "SA", "SB").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(store.find_super_label_components("lib1", "SA").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_component_of_regular_label_rejected() {
        let store = setup().await;
        store.insert_label(&label("R1", LabelKind::Regular)).await.unwrap();
        store.insert_label(&label("R2", LabelKind::Regular)).await.unwrap();

        let result = store.add_super_label_component("lib1", "R1", "R2").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_label_id_reuse_rejected() {
        let store = setup().await;
        store.insert_label(&label("X", LabelKind::Regular)).await.unwrap();

        let result = store.insert_label(&label("X", LabelKind::Super)).await;
        assert!(result.is_err());

        let labels = store.find_labels_by_ids("lib1", &["X".to_string()]).await.unwrap();
        assert_eq!(labels[0].kind, LabelKind::Regular);
    }

    #[tokio::test]
    async fn test_create_label_generates_id() {
        let store = setup().await;
        let created = store.create_label("lib1", "Chill", LabelKind::Regular).await.unwrap();

        assert!(Uuid::parse_str(&created.label_id).is_ok());
        let found = store.find_labels_by_ids("lib1", &[created.label_id.clone()]).await.unwrap();
        assert_eq!(found, vec![created]);
    }

    #[tokio::test]
    async fn test_reads_are_library_scoped() {
        let store = setup().await;
        store.create_library(&library("lib2", "Other")).await.unwrap();
        store.insert_label(&label("R1", LabelKind::Regular)).await.unwrap();
        store
            .insert_label(&Label {
                library_id: "lib2".to_string(),
                ..label("R2", LabelKind::Regular)
            })
            .await
            .unwrap();

        let found = store
            .find_labels_by_ids("lib1", &["R1".to_string(), "R2".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label_id, "R1");
        assert!(store.find_all_songs("lib2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_untag_song() {
        let store = setup().await;
        store.insert_label(&label("R1", LabelKind::Regular)).await.unwrap();
        store.tag_song("lib1", "S1", "R1").await.unwrap();

        assert!(store.untag_song("lib1", "S1", "R1").await.unwrap());
        assert!(!store.untag_song("lib1", "S1", "R1").await.unwrap());
    }
}
