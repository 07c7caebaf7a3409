//! Domain models for the artist catalog
//!
//! This module contains the artist model, the closed set of contribution
//! roles and the types returned by index browsing.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// Roles
// =============================================================================

/// Musical contribution type under which artist statistics are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    AlbumArtist,
    Composer,
    Conductor,
    Lyricist,
    Arranger,
    Producer,
    Director,
    Engineer,
    Mixer,
    Remixer,
    DjMixer,
    Performer,
}

/// Returned when a string does not name one of the known [`Role`]s
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 13] = [
        Role::Artist,
        Role::AlbumArtist,
        Role::Composer,
        Role::Conductor,
        Role::Lyricist,
        Role::Arranger,
        Role::Producer,
        Role::Director,
        Role::Engineer,
        Role::Mixer,
        Role::Remixer,
        Role::DjMixer,
        Role::Performer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Artist => "artist",
            Role::AlbumArtist => "albumartist",
            Role::Composer => "composer",
            Role::Conductor => "conductor",
            Role::Lyricist => "lyricist",
            Role::Arranger => "arranger",
            Role::Producer => "producer",
            Role::Director => "director",
            Role::Engineer => "engineer",
            Role::Mixer => "mixer",
            Role::Remixer => "remixer",
            Role::DjMixer => "djmixer",
            Role::Performer => "performer",
        }
    }

    /// JSON path expression selecting this role's entry in the `stats` column.
    ///
    /// Every expression is a compile-time literal so no caller-provided text
    /// can reach the SQL statement.
    pub fn stats_path(&self) -> &'static str {
        match self {
            Role::Artist => "stats ->> '$.artist'",
            Role::AlbumArtist => "stats ->> '$.albumartist'",
            Role::Composer => "stats ->> '$.composer'",
            Role::Conductor => "stats ->> '$.conductor'",
            Role::Lyricist => "stats ->> '$.lyricist'",
            Role::Arranger => "stats ->> '$.arranger'",
            Role::Producer => "stats ->> '$.producer'",
            Role::Director => "stats ->> '$.director'",
            Role::Engineer => "stats ->> '$.engineer'",
            Role::Mixer => "stats ->> '$.mixer'",
            Role::Remixer => "stats ->> '$.remixer'",
            Role::DjMixer => "stats ->> '$.djmixer'",
            Role::Performer => "stats ->> '$.performer'",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// =============================================================================
// Artist
// =============================================================================

/// Aggregated counters for one role (or for all roles, under `total`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistStats {
    /// Total size in bytes of the songs
    #[serde(rename = "s", default)]
    pub size: i64,
    #[serde(rename = "m", default)]
    pub song_count: i32,
    #[serde(rename = "a", default)]
    pub album_count: i32,
}

/// Lightweight reference to another artist. The id is empty when the
/// referenced artist is not in the library.
///
/// Written with lower-case keys; read with `id`/`name` matched in any case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtistRef {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
}

impl<'de> Deserialize<'de> for ArtistRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let mut artist_ref = ArtistRef::default();

        for (key, value) in fields {
            let slot = if key.eq_ignore_ascii_case("id") {
                &mut artist_ref.id
            } else if key.eq_ignore_ascii_case("name") {
                &mut artist_ref.name
            } else {
                continue;
            };

            match value {
                Value::String(s) => *slot = s,
                Value::Null => {}
                other => {
                    return Err(de::Error::invalid_type(
                        unexpected(&other),
                        &"a string or null",
                    ))
                }
            }
        }

        Ok(artist_ref)
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
        Value::String(s) => de::Unexpected::Str(s),
        Value::Null => de::Unexpected::Unit,
    }
}

impl ArtistRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Music artist with aggregated library statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Artist {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Sort name from tags, may be empty
    pub sort_artist_name: String,
    /// Lower-cased name with leading articles removed
    pub order_artist_name: String,
    /// MusicBrainz identifier, may be empty
    pub mbz_artist_id: String,
    /// Referenced by metadata but not confirmed present in the library
    pub missing: bool,
    #[sqlx(skip)]
    pub size: i64,
    #[sqlx(skip)]
    pub song_count: i32,
    #[sqlx(skip)]
    pub album_count: i32,
    /// Per-role counters
    #[sqlx(skip)]
    pub stats: HashMap<Role, ArtistStats>,
    #[sqlx(skip)]
    pub similar_artists: Vec<ArtistRef>,
    /// Timestamps
    pub created_at: i64,
    pub updated_at: i64,
}

impl Artist {
    /// Create a new artist with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Validate artist data
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Artist id cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err("Artist name cannot be empty".to_string());
        }

        Ok(())
    }

    /// Counters for the given role, if the artist has any
    pub fn role_stats(&self, role: Role) -> Option<&ArtistStats> {
        self.stats.get(&role)
    }
}

// =============================================================================
// Index
// =============================================================================

/// One alphabetical bucket of the artist index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistIndex {
    /// Group key, e.g. `"B"`, `"X-Z"` or `"#"`
    pub id: String,
    pub artists: Vec<Artist>,
}
