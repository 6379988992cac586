use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrackSummary;

/// A user-named, ordered collection of tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub tracks: Vec<TrackSummary>,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Appends `track` unless a track with the same id is already present.
    /// Returns whether the playlist changed.
    pub fn add_track(&mut self, track: TrackSummary) -> bool {
        if self.tracks.iter().any(|t| t.id == track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Returns whether a track was removed
    pub fn remove_track(&mut self, track_id: &str) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != track_id);
        self.tracks.len() != before
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> TrackSummary {
        TrackSummary {
            id: id.to_string(),
            name: format!("Track {}", id),
            artist_name: "Artist".to_string(),
            audio_url: format!("https://cdn.example/{}.mp3", id),
            album_image: None,
            duration: 180,
        }
    }

    fn empty_playlist() -> Playlist {
        Playlist {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            name: "Road trip".to_string(),
            tracks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_track_is_idempotent_by_id() {
        let mut playlist = empty_playlist();

        assert!(playlist.add_track(track("1")));
        assert!(!playlist.add_track(track("1")));
        assert!(playlist.add_track(track("2")));

        let ids: Vec<&str> = playlist.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_remove_missing_track_is_noop() {
        let mut playlist = empty_playlist();
        playlist.add_track(track("1"));

        assert!(!playlist.remove_track("9"));
        assert!(playlist.remove_track("1"));
        assert!(playlist.tracks.is_empty());
    }
}
