//! Mapping between [`Artist`] and the `artist` table row.
//!
//! Two columns hold JSON: `stats` (role name to counters, plus a `total`
//! entry) and `similar_artists` (an array of id/name references). Reads
//! decode both after the row is scanned; writes encode the references and
//! derive the `full_text` search column.

use crate::error::{LibraryError, Result};
use crate::models::{Artist, ArtistRef, ArtistStats, Role};
use crate::query::SqlValue;
use crate::text;
use serde_json::Value;
use sqlx::FromRow;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Key of the all-roles entry in the `stats` column
const TOTAL_STATS_KEY: &str = "total";

/// Column name to value, as written by an upsert
pub(crate) type ColumnArgs = BTreeMap<&'static str, SqlValue>;

/// Raw `artist` row with its JSON columns still encoded
#[derive(Debug, Default, FromRow)]
pub(crate) struct DbArtist {
    #[sqlx(flatten)]
    pub artist: Artist,
    pub stats: String,
    pub similar_artists: String,
}

impl DbArtist {
    /// Decodes the JSON columns into the artist.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Decode` if either column is not valid JSON.
    pub fn post_scan(self) -> Result<Artist> {
        let DbArtist {
            mut artist,
            stats,
            similar_artists,
        } = self;

        let stats = decode_column::<HashMap<String, Value>>(&artist.id, "stats", &stats)?
            .unwrap_or_default();
        apply_stats(&mut artist, stats)?;

        artist.similar_artists =
            decode_column::<Vec<ArtistRef>>(&artist.id, "similar_artists", &similar_artists)?
                .unwrap_or_default();

        Ok(artist)
    }
}

fn decode_column<T: serde::de::DeserializeOwned>(
    id: &str,
    column: &'static str,
    raw: &str,
) -> Result<Option<T>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str::<Option<T>>(raw).map_err(|source| decode_error(id, column, source))
}

fn decode_error(id: &str, column: &'static str, source: serde_json::Error) -> LibraryError {
    warn!(artist_id = %id, column, error = %source, "Malformed JSON column");
    LibraryError::Decode {
        column,
        id: id.to_string(),
        source,
    }
}

/// Splits decoded stats into the artist totals and the per-role map.
///
/// Null entries are skipped. Entries that name no known role are dropped
/// without looking at their values.
fn apply_stats(artist: &mut Artist, stats: HashMap<String, Value>) -> Result<()> {
    artist.stats.clear();

    for (key, value) in stats {
        if value.is_null() {
            continue;
        }

        let role = if key == TOTAL_STATS_KEY {
            None
        } else {
            match key.parse::<Role>() {
                Ok(role) => Some(role),
                Err(unknown) => {
                    debug!(artist_id = %artist.id, %unknown, "Ignoring stats entry");
                    continue;
                }
            }
        };

        let counters: ArtistStats = serde_json::from_value(value)
            .map_err(|source| decode_error(&artist.id, "stats", source))?;

        match role {
            Some(role) => {
                artist.stats.insert(role, counters);
            }
            None => {
                artist.size = counters.size;
                artist.song_count = counters.song_count;
                artist.album_count = counters.album_count;
            }
        }
    }

    Ok(())
}

/// Plain column values of an artist. JSON and derived columns are added by
/// [`post_map_args`].
pub(crate) fn to_column_args(artist: &Artist) -> ColumnArgs {
    let mut args = ColumnArgs::new();
    args.insert("id", artist.id.clone().into());
    args.insert("name", artist.name.clone().into());
    args.insert("sort_artist_name", artist.sort_artist_name.clone().into());
    args.insert("order_artist_name", artist.order_artist_name.clone().into());
    args.insert("mbz_artist_id", artist.mbz_artist_id.clone().into());
    args.insert("missing", artist.missing.into());
    args.insert("created_at", artist.created_at.into());
    args.insert("updated_at", artist.updated_at.into());
    args
}

/// Completes the column values for a write.
///
/// `similar_artists` is always encoded (`[]` when empty) and `full_text` is
/// derived from the names. Empty `sort_artist_name` and `mbz_artist_id` are
/// removed so an upsert keeps the stored values.
pub(crate) fn post_map_args(artist: &Artist, args: &mut ColumnArgs) -> Result<()> {
    args.insert(
        "similar_artists",
        encode_similar_artists(&artist.similar_artists)?.into(),
    );
    args.insert(
        "full_text",
        text::format_full_text(&[&artist.name, &artist.sort_artist_name]).into(),
    );

    for column in ["sort_artist_name", "mbz_artist_id"] {
        let keep = args
            .get(column)
            .and_then(SqlValue::as_text)
            .is_some_and(|v| !v.is_empty());
        if !keep {
            args.remove(column);
        }
    }

    Ok(())
}

pub(crate) fn encode_similar_artists(refs: &[ArtistRef]) -> Result<String> {
    Ok(serde_json::to_string(refs)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eddie() -> Artist {
        Artist {
            id: "1".to_string(),
            name: "Eddie Van Halen".to_string(),
            sort_artist_name: "Van Halen, Eddie".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_post_scan_parses_stats_and_similar_artists() {
        let stats = serde_json::json!({
            "total": {"s": 1000, "m": 10, "a": 2},
            "composer": {"s": 500, "m": 5, "a": 1},
        });
        let row = DbArtist {
            artist: eddie(),
            stats: stats.to_string(),
            similar_artists: r#"[{"id":"2","Name":"AC/DC"},{"name":"Test;With:Sep,Chars"}]"#
                .to_string(),
        };

        let artist = row.post_scan().unwrap();

        assert_eq!(artist.size, 1000);
        assert_eq!(artist.song_count, 10);
        assert_eq!(artist.album_count, 2);
        assert_eq!(artist.stats.len(), 1);
        let composer = artist.stats[&Role::Composer];
        assert_eq!(composer.size, 500);
        assert_eq!(composer.song_count, 5);
        assert_eq!(composer.album_count, 1);
        assert_eq!(artist.similar_artists.len(), 2);
        assert_eq!(artist.similar_artists[0].id, "2");
        assert_eq!(artist.similar_artists[0].name, "AC/DC");
        assert!(artist.similar_artists[1].id.is_empty());
        assert_eq!(artist.similar_artists[1].name, "Test;With:Sep,Chars");
    }

    #[test]
    fn test_post_scan_drops_unknown_roles() {
        let row = DbArtist {
            artist: eddie(),
            stats: r#"{"wizard":{"s":1,"m":1,"a":1},"producer":{"s":2,"m":2,"a":1}}"#.to_string(),
            similar_artists: "[]".to_string(),
        };

        let artist = row.post_scan().unwrap();
        assert_eq!(artist.stats.len(), 1);
        assert!(artist.role_stats(Role::Producer).is_some());
        assert_eq!(artist.size, 0);
    }

    #[test]
    fn test_post_scan_ignores_unknown_entries_of_any_shape() {
        let row = DbArtist {
            artist: eddie(),
            stats: r#"{"wizard":5,"bard":[1,2],"composer":{"s":500,"m":5,"a":1}}"#.to_string(),
            similar_artists: "[]".to_string(),
        };

        let artist = row.post_scan().unwrap();
        assert_eq!(artist.stats.len(), 1);
        assert_eq!(artist.stats[&Role::Composer].song_count, 5);
    }

    #[test]
    fn test_post_scan_skips_null_stats_entries() {
        let row = DbArtist {
            artist: eddie(),
            stats: r#"{"total":{"s":1000,"m":10,"a":2},"composer":null}"#.to_string(),
            similar_artists: "[]".to_string(),
        };

        let artist = row.post_scan().unwrap();
        assert_eq!(artist.song_count, 10);
        assert!(artist.stats.is_empty());
    }

    #[test]
    fn test_post_scan_rejects_malformed_known_role() {
        let row = DbArtist {
            artist: eddie(),
            stats: r#"{"producer":"lots"}"#.to_string(),
            similar_artists: "[]".to_string(),
        };

        let err = row.post_scan().unwrap_err();
        assert!(matches!(err, LibraryError::Decode { column: "stats", .. }));
    }

    #[test]
    fn test_post_scan_matches_similar_artist_keys_in_any_case() {
        let row = DbArtist {
            artist: eddie(),
            stats: "{}".to_string(),
            similar_artists: r#"[{"iD":"7","NAME":"Can"}]"#.to_string(),
        };

        let artist = row.post_scan().unwrap();
        assert_eq!(artist.similar_artists, vec![ArtistRef::new("7", "Can")]);
    }

    #[test]
    fn test_post_scan_accepts_empty_and_null_columns() {
        let row = DbArtist {
            artist: eddie(),
            stats: String::new(),
            similar_artists: "null".to_string(),
        };

        let artist = row.post_scan().unwrap();
        assert!(artist.stats.is_empty());
        assert!(artist.similar_artists.is_empty());
    }

    #[test]
    fn test_post_scan_rejects_malformed_json() {
        let row = DbArtist {
            artist: eddie(),
            stats: "{not json".to_string(),
            similar_artists: "[]".to_string(),
        };
        let err = row.post_scan().unwrap_err();
        assert!(matches!(err, LibraryError::Decode { column: "stats", .. }));

        let row = DbArtist {
            artist: eddie(),
            stats: "{}".to_string(),
            similar_artists: r#"[{"id":"2""#.to_string(),
        };
        let err = row.post_scan().unwrap_err();
        assert!(matches!(
            err,
            LibraryError::Decode {
                column: "similar_artists",
                ..
            }
        ));
    }

    #[test]
    fn test_post_map_args_maps_empty_similar_artists() {
        let mut args = ColumnArgs::new();
        post_map_args(&eddie(), &mut args).unwrap();
        assert_eq!(args.get("similar_artists"), Some(&SqlValue::from("[]")));
    }

    #[test]
    fn test_post_map_args_maps_similar_artists_and_full_text() {
        let mut artist = eddie();
        artist.similar_artists = vec![
            ArtistRef::new("2", "AC/DC"),
            ArtistRef::new("", "Test;With:Sep,Chars"),
        ];

        let mut args = ColumnArgs::new();
        post_map_args(&artist, &mut args).unwrap();

        assert_eq!(
            args.get("similar_artists"),
            Some(&SqlValue::from(
                r#"[{"id":"2","name":"AC/DC"},{"name":"Test;With:Sep,Chars"}]"#
            ))
        );
        assert_eq!(args.get("full_text"), Some(&SqlValue::from(" eddie halen van")));
    }

    #[test]
    fn test_post_map_args_does_not_override_empty_sort_name_and_mbid() {
        let mut args = ColumnArgs::new();
        args.insert("sort_artist_name", SqlValue::from(""));
        args.insert("mbz_artist_id", SqlValue::from(""));

        post_map_args(&eddie(), &mut args).unwrap();

        assert!(!args.contains_key("sort_artist_name"));
        assert!(!args.contains_key("mbz_artist_id"));
    }

    #[test]
    fn test_column_args_keep_present_values() {
        let mut artist = eddie();
        artist.mbz_artist_id = "5b11f4ce-a62d-471e-81fc-a69a8278c7da".to_string();

        let mut args = to_column_args(&artist);
        post_map_args(&artist, &mut args).unwrap();

        assert_eq!(
            args.get("sort_artist_name"),
            Some(&SqlValue::from("Van Halen, Eddie"))
        );
        assert_eq!(
            args.get("mbz_artist_id"),
            Some(&SqlValue::from("5b11f4ce-a62d-471e-81fc-a69a8278c7da"))
        );
        assert_eq!(args.get("missing"), Some(&SqlValue::Bool(false)));
        assert!(!args.contains_key("stats"));
    }

    #[test]
    fn test_similar_artists_survive_encode_and_decode() {
        let refs = vec![ArtistRef::new("7", "Neu!"), ArtistRef::new("", "Harmonia")];
        let row = DbArtist {
            artist: eddie(),
            stats: "{}".to_string(),
            similar_artists: encode_similar_artists(&refs).unwrap(),
        };

        assert_eq!(row.post_scan().unwrap().similar_artists, refs);
    }
}
