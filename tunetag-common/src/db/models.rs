//! Database models
//!
//! Every entity carries its `library_id`; no entity is visible outside its library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub library_id: String,
    pub name: String,
}

/// A song in a library
///
/// Display attributes are payload only; filtering never looks at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub song_id: String,
    pub library_id: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<i64>,
}

/// Label kind
///
/// REGULAR labels are assigned to songs directly. SUPER labels stand for a
/// set of REGULAR labels (their components).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Regular,
    Super,
}

impl LabelKind {
    /// Value stored in the `labels.kind` column
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Regular => "regular",
            LabelKind::Super => "super",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(LabelKind::Regular),
            "super" => Ok(LabelKind::Super),
            other => Err(Error::InvalidInput(format!("Unknown label kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub label_id: String,
    pub library_id: String,
    pub name: String,
    pub kind: LabelKind,
}

impl Label {
    pub fn is_super(&self) -> bool {
        matches!(self.kind, LabelKind::Super)
    }
}

/// Edge: SUPER label `super_label_id` is composed of REGULAR label `regular_label_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperLabelComponent {
    pub library_id: String,
    pub super_label_id: String,
    pub regular_label_id: String,
}

/// Edge: song `song_id` carries REGULAR label `label_id`
///
/// At most one edge exists per (song_id, label_id) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongLabel {
    pub library_id: String,
    pub song_id: String,
    pub label_id: String,
}
