use serde::{Deserialize, Serialize};

/// A track returned by the external catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTrack {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub audio_url: String,
    pub album_image: Option<String>,
    pub album_name: Option<String>,
    /// Length in seconds
    pub duration: u32,
    /// Raw catalog genre tags, not yet synonym-mapped
    pub genre_tags: Vec<String>,
}

impl CandidateTrack {
    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            artist_name: self.artist_name.clone(),
            audio_url: self.audio_url.clone(),
            album_image: self.album_image.clone(),
            duration: self.duration,
        }
    }
}

/// Track metadata sent by clients when favoriting or adding to a playlist
///
/// Accepts the catalog's own field names (`artist_name`, `audio`) so clients can
/// forward catalog payloads untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    #[serde(alias = "artist_name")]
    pub artist_name: String,
    #[serde(alias = "audio")]
    pub audio_url: String,
    #[serde(default, alias = "album_image")]
    pub album_image: Option<String>,
    #[serde(default)]
    pub duration: u32,
}

/// Result ordering understood by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrder {
    PopularityTotal,
    ReleaseDate,
}

impl TrackOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackOrder::PopularityTotal => "popularity_total",
            TrackOrder::ReleaseDate => "releasedate",
        }
    }
}

/// Catalog search parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackQuery {
    /// Tracks carrying any of these tags
    pub genre_tags: Vec<String>,
    /// Tracks carrying exactly this tag
    pub tag: Option<String>,
    pub keyword: Option<String>,
    pub artist_name: Option<String>,
    pub order: Option<TrackOrder>,
    pub boost: Option<TrackOrder>,
    pub offset: u32,
    /// Opaque diversity token forwarded to the catalog
    pub seed: Option<u64>,
    pub limit: u32,
}

impl TrackQuery {
    /// Popular tracks tagged with any of `genres`, with genre info included
    pub fn by_genres(genres: &[String], limit: u32, offset: u32, seed: u64) -> Self {
        Self {
            genre_tags: genres.to_vec(),
            order: Some(TrackOrder::PopularityTotal),
            boost: Some(TrackOrder::PopularityTotal),
            offset,
            seed: Some(seed),
            limit,
            ..Default::default()
        }
    }

    pub fn by_keyword(keyword: &str, limit: u32) -> Self {
        Self {
            keyword: Some(keyword.to_string()),
            limit,
            ..Default::default()
        }
    }
}

/// Fixed catalog listings offered for browsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCategory {
    NewReleases,
    Popular,
    Artist(String),
    Tag(String),
}

impl BrowseCategory {
    pub fn to_query(&self, limit: u32) -> TrackQuery {
        let mut query = TrackQuery {
            limit,
            ..Default::default()
        };
        match self {
            BrowseCategory::NewReleases => query.order = Some(TrackOrder::ReleaseDate),
            BrowseCategory::Popular => query.order = Some(TrackOrder::PopularityTotal),
            BrowseCategory::Artist(name) => query.artist_name = Some(name.clone()),
            BrowseCategory::Tag(tag) => query.tag = Some(tag.clone()),
        }
        query
    }
}

// ============================================================================
// Jamendo API Types
// ============================================================================

/// Envelope of every Jamendo `/tracks/` response
#[derive(Debug, Clone, Deserialize)]
pub struct JamendoResponse {
    pub headers: JamendoHeaders,
    #[serde(default)]
    pub results: Vec<JamendoTrack>,
}

/// Jamendo reports failures in the body with a 200 status
#[derive(Debug, Clone, Deserialize)]
pub struct JamendoHeaders {
    pub status: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error_message: String,
}

impl JamendoHeaders {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JamendoTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub album_image: Option<String>,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub musicinfo: Option<JamendoMusicInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JamendoMusicInfo {
    #[serde(default)]
    pub tags: JamendoTags,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JamendoTags {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default)]
    pub vartags: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<JamendoTrack> for CandidateTrack {
    fn from(track: JamendoTrack) -> Self {
        CandidateTrack {
            id: track.id,
            name: track.name,
            artist_name: track.artist_name,
            audio_url: track.audio,
            album_image: non_empty(track.album_image),
            album_name: non_empty(track.album_name),
            duration: track.duration,
            genre_tags: track.musicinfo.map(|info| info.tags.genres).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jamendo_track_to_candidate() {
        let track: JamendoTrack = serde_json::from_value(json!({
            "id": "1532771",
            "name": "Night Drive",
            "duration": 214,
            "artist_name": "Skaut",
            "album_name": "Roads",
            "album_image": "https://usercontent.jamendo.com/a.jpg",
            "audio": "https://prod-1.storage.jamendo.com/?trackid=1532771",
            "musicinfo": {
                "vocalinstrumental": "instrumental",
                "tags": { "genres": ["electronic", "house"], "instruments": ["synthesizer"], "vartags": [] }
            }
        }))
        .unwrap();

        let candidate = CandidateTrack::from(track);
        assert_eq!(candidate.id, "1532771");
        assert_eq!(candidate.artist_name, "Skaut");
        assert_eq!(candidate.duration, 214);
        assert_eq!(candidate.album_name.as_deref(), Some("Roads"));
        assert_eq!(candidate.genre_tags, vec!["electronic", "house"]);
    }

    #[test]
    fn test_jamendo_track_without_musicinfo() {
        let track: JamendoTrack = serde_json::from_value(json!({
            "id": "42",
            "name": "Plain",
            "artist_name": "Nobody",
            "album_image": "",
            "audio": "https://cdn.example/42.mp3"
        }))
        .unwrap();

        let candidate = CandidateTrack::from(track);
        assert!(candidate.genre_tags.is_empty());
        assert_eq!(candidate.album_image, None);
        assert_eq!(candidate.duration, 0);
    }

    #[test]
    fn test_failed_headers() {
        let response: JamendoResponse = serde_json::from_value(json!({
            "headers": { "status": "failed", "code": 5, "error_message": "Your credential is not authorized." }
        }))
        .unwrap();

        assert!(!response.headers.is_success());
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_summary_accepts_catalog_field_names() {
        let summary: TrackSummary = serde_json::from_value(json!({
            "id": "7",
            "name": "Tune",
            "artist_name": "Band",
            "audio": "https://cdn.example/7.mp3",
            "album_image": "https://cdn.example/7.jpg",
            "duration": 99
        }))
        .unwrap();

        assert_eq!(summary.artist_name, "Band");
        assert_eq!(summary.audio_url, "https://cdn.example/7.mp3");
        assert_eq!(summary.album_image.as_deref(), Some("https://cdn.example/7.jpg"));
    }

    #[test]
    fn test_genre_query_orders_by_popularity() {
        let genres = vec!["rock".to_string(), "pop".to_string()];
        let query = TrackQuery::by_genres(&genres, 30, 20, 1234);

        assert_eq!(query.genre_tags, genres);
        assert_eq!(query.order, Some(TrackOrder::PopularityTotal));
        assert_eq!(query.boost, Some(TrackOrder::PopularityTotal));
        assert_eq!(query.offset, 20);
        assert_eq!(query.seed, Some(1234));
        assert_eq!(query.limit, 30);
    }

    #[test]
    fn test_browse_categories() {
        assert_eq!(
            BrowseCategory::NewReleases.to_query(10).order,
            Some(TrackOrder::ReleaseDate)
        );
        assert_eq!(
            BrowseCategory::Artist("Skaut".to_string()).to_query(10).artist_name.as_deref(),
            Some("Skaut")
        );
        assert_eq!(
            BrowseCategory::Tag("rock".to_string()).to_query(10).tag.as_deref(),
            Some("rock")
        );
    }
}
