//! Database initialization
//!
//! Creates the database on first run and applies the schema idempotently.
//! Every table is partitioned by `library_id`.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets filter reads proceed while tagging writes are in flight
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Initialize a private in-memory database (tests, one-shot CLI runs)
///
/// Limited to one connection that is never recycled: each SQLite in-memory
/// connection is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    create_libraries_table(pool).await?;
    create_songs_table(pool).await?;
    create_labels_table(pool).await?;

    // Linking tables
    create_super_label_components_table(pool).await?;
    create_song_labels_table(pool).await?;

    Ok(())
}

async fn create_libraries_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS libraries (
            library_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            library_id TEXT NOT NULL REFERENCES libraries(library_id) ON DELETE CASCADE,
            song_id TEXT NOT NULL,
            title TEXT NOT NULL,
            artist TEXT,
            album TEXT,
            duration_ms INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (library_id, song_id),
            CHECK (duration_ms IS NULL OR duration_ms >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_title ON songs(library_id, title)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the labels table
///
/// `kind` is fixed at creation; there is no statement that updates it.
async fn create_labels_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS labels (
            library_id TEXT NOT NULL REFERENCES libraries(library_id) ON DELETE CASCADE,
            label_id TEXT NOT NULL,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('regular', 'super')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (library_id, label_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the super_label_components table
///
/// One row per (SUPER label, REGULAR component) pair.
async fn create_super_label_components_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS super_label_components (
            library_id TEXT NOT NULL,
            super_label_id TEXT NOT NULL,
            regular_label_id TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (library_id, super_label_id, regular_label_id),
            FOREIGN KEY (library_id, super_label_id)
                REFERENCES labels(library_id, label_id) ON DELETE CASCADE,
            FOREIGN KEY (library_id, regular_label_id)
                REFERENCES labels(library_id, label_id) ON DELETE CASCADE,
            CHECK (super_label_id <> regular_label_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the song_labels table
///
/// The composite primary key guarantees at most one edge per (song, label)
/// pair. AND-matching counts edges per song and depends on this.
async fn create_song_labels_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_labels (
            library_id TEXT NOT NULL,
            song_id TEXT NOT NULL,
            label_id TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (library_id, song_id, label_id),
            FOREIGN KEY (library_id, song_id)
                REFERENCES songs(library_id, song_id) ON DELETE CASCADE,
            FOREIGN KEY (library_id, label_id)
                REFERENCES labels(library_id, label_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_song_labels_label ON song_labels(library_id, label_id)")
        .execute(pool)
        .await?;

    Ok(())
}
