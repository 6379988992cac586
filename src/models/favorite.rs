use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TrackSummary;

/// Genre tags as they were written to storage
///
/// Older favorites wrap the tag list in an object (`{"genres": [...]}`), newer ones
/// store the list directly. Both are decoded here so nothing downstream has to care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StoredGenres {
    /// A plain array of tags
    Flat(Vec<String>),
    /// Legacy `{"genres": [...]}` wrapper
    Wrapped(Vec<String>),
    /// Anything else, kept verbatim so it round-trips
    Malformed(Value),
}

impl StoredGenres {
    /// Canonical tag list, or `None` when the stored shape is unusable
    pub fn tags(&self) -> Option<&[String]> {
        match self {
            StoredGenres::Flat(tags) | StoredGenres::Wrapped(tags) => Some(tags),
            StoredGenres::Malformed(_) => None,
        }
    }
}

impl Default for StoredGenres {
    fn default() -> Self {
        StoredGenres::Flat(Vec::new())
    }
}

/// Keeps the string entries of a JSON array, dropping anything else
fn string_entries(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

impl From<Value> for StoredGenres {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StoredGenres::Flat(Vec::new()),
            Value::Array(items) => StoredGenres::Flat(string_entries(&items)),
            Value::Object(map) => {
                if let Some(Value::Array(items)) = map.get("genres") {
                    return StoredGenres::Wrapped(string_entries(items));
                }
                StoredGenres::Malformed(Value::Object(map))
            }
            other => StoredGenres::Malformed(other),
        }
    }
}

impl From<StoredGenres> for Value {
    fn from(genres: StoredGenres) -> Self {
        match genres {
            StoredGenres::Flat(tags) => Value::from(tags),
            StoredGenres::Wrapped(tags) => serde_json::json!({ "genres": tags }),
            StoredGenres::Malformed(raw) => raw,
        }
    }
}

impl From<Vec<String>> for StoredGenres {
    fn from(tags: Vec<String>) -> Self {
        StoredGenres::Flat(tags)
    }
}

/// One track a user has marked as favorite
///
/// Track metadata is denormalized so favorites can be listed without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub id: String,
    pub user_id: String,
    pub track_id: String,
    pub track_name: String,
    pub track_artist: String,
    pub track_url: String,
    #[serde(default)]
    pub album_image: Option<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub genres: StoredGenres,
    pub created_at: DateTime<Utc>,
}

/// A favorite that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub user_id: String,
    pub track_id: String,
    pub track_name: String,
    pub track_artist: String,
    pub track_url: String,
    pub album_image: Option<String>,
    pub duration: u32,
    pub genres: StoredGenres,
}

impl NewFavorite {
    pub fn from_track(user_id: &str, track: &TrackSummary, genres: Vec<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            track_id: track.id.clone(),
            track_name: track.name.clone(),
            track_artist: track.artist_name.clone(),
            track_url: track.audio_url.clone(),
            album_image: track.album_image.clone(),
            duration: track.duration,
            genres: StoredGenres::Flat(genres),
        }
    }

    /// Attaches the id and timestamp assigned by the store
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> FavoriteRecord {
        FavoriteRecord {
            id,
            user_id: self.user_id,
            track_id: self.track_id,
            track_name: self.track_name,
            track_artist: self.track_artist,
            track_url: self.track_url,
            album_image: self.album_image,
            duration: self.duration,
            genres: self.genres,
            created_at,
        }
    }
}

/// Outcome of flipping a track's favorite status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum FavoriteToggle {
    Added { favorite: FavoriteRecord },
    Removed { track_id: String },
}
