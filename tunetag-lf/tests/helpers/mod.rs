//! Shared test helpers: in-memory SQLite store seeded from the bundled fixtures

#![allow(dead_code)]

use std::sync::Arc;
use tunetag_common::db::init_memory_database;
use tunetag_lf::fixture::LibraryFixture;
use tunetag_lf::{FilterResult, SqliteLabelStore};

pub const LIB1_FIXTURE: &str = include_str!("../../fixtures/lib1.json");
pub const LIB2_FIXTURE: &str = include_str!("../../fixtures/lib2.json");

/// Store holding both fixture libraries
pub async fn seeded_store() -> Arc<SqliteLabelStore> {
    let pool = init_memory_database()
        .await
        .expect("Failed to create in-memory database");
    let store = SqliteLabelStore::new(pool);

    for fixture in [LIB1_FIXTURE, LIB2_FIXTURE] {
        LibraryFixture::from_json(fixture)
            .expect("Fixture should parse")
            .apply(&store)
            .await
            .expect("Fixture should load");
    }

    Arc::new(store)
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Song ids of a result, sorted
pub fn song_ids(result: &FilterResult) -> Vec<String> {
    let mut ids: Vec<String> = result.songs.iter().map(|s| s.song_id.clone()).collect();
    ids.sort();
    ids
}
