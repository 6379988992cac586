//! Jamendo catalog provider (API v3.0, `/tracks/` endpoint)
//!
//! Jamendo answers failed requests with HTTP 200 and `headers.status = "failed"`,
//! so both the HTTP status and the body envelope are checked.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CandidateTrack, JamendoResponse, TrackQuery},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;

const TRACK_CACHE_TTL: u64 = 3600; // 1 hour
const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct JamendoProvider {
    http_client: HttpClient,
    client_id: String,
    api_url: String,
    cache: Option<Cache>,
}

impl JamendoProvider {
    pub fn new(cache: Option<Cache>, client_id: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            client_id,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Query-string pairs for a track search, in a stable order
    fn query_params(&self, query: &TrackQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("client_id", self.client_id.clone()),
            ("format", "json".to_string()),
            ("include", "musicinfo".to_string()),
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];

        if !query.genre_tags.is_empty() {
            // Space-separated tags are OR-combined by Jamendo
            params.push(("tags", query.genre_tags.join(" ")));
        }
        if let Some(tag) = &query.tag {
            params.push(("tag", tag.clone()));
        }
        if let Some(keyword) = &query.keyword {
            params.push(("search", keyword.clone()));
        }
        if let Some(artist) = &query.artist_name {
            params.push(("artist_name", artist.clone()));
        }
        if let Some(order) = query.order {
            params.push(("order", order.as_str().to_string()));
        }
        if let Some(boost) = query.boost {
            params.push(("boost", boost.as_str().to_string()));
        }
        if let Some(seed) = query.seed {
            params.push(("random", seed.to_string()));
        }

        params
    }

    async fn request_tracks(
        &self,
        params: &[(&'static str, String)],
    ) -> AppResult<Vec<CandidateTrack>> {
        let url = format!("{}/tracks/", self.api_url);
        let response = self.http_client.get(&url).query(params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Jamendo returned status {}: {}",
                status, body
            )));
        }

        let body: JamendoResponse = response.json().await?;
        Self::convert_response(body)
    }

    fn convert_response(body: JamendoResponse) -> AppResult<Vec<CandidateTrack>> {
        if !body.headers.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Jamendo request failed (code {}): {}",
                body.headers.code, body.headers.error_message
            )));
        }

        Ok(body.results.into_iter().map(CandidateTrack::from).collect())
    }

    async fn search_uncached(&self, query: &TrackQuery) -> AppResult<Vec<CandidateTrack>> {
        let params = self.query_params(query);
        let tracks = self.request_tracks(&params).await?;

        tracing::info!(
            genres = ?query.genre_tags,
            offset = query.offset,
            limit = query.limit,
            results = tracks.len(),
            provider = "jamendo",
            "Track search completed"
        );

        Ok(tracks)
    }

    async fn fetch_track_uncached(&self, track_id: &str) -> AppResult<Option<CandidateTrack>> {
        let params = vec![
            ("client_id", self.client_id.clone()),
            ("format", "json".to_string()),
            ("include", "musicinfo".to_string()),
            ("id", track_id.to_string()),
        ];
        let track = self.request_tracks(&params).await?.into_iter().next();

        tracing::info!(
            track_id = %track_id,
            found = track.is_some(),
            provider = "jamendo",
            "Track lookup completed"
        );

        Ok(track)
    }
}

/// Cache key for the first page of a keyword search or a fixed listing.
/// Seeded genre queries are meant to vary and are never cached.
fn cache_key(query: &TrackQuery) -> Option<CacheKey> {
    if query.seed.is_some() || query.offset != 0 || !query.genre_tags.is_empty() {
        return None;
    }

    if let Some(keyword) = &query.keyword {
        return Some(CacheKey::TrackSearch(format!("{}:{}", keyword, query.limit)));
    }

    let listing = match (&query.artist_name, &query.tag, query.order) {
        (Some(artist), _, _) => format!("artist:{}", artist),
        (None, Some(tag), _) => format!("tag:{}", tag),
        (None, None, Some(order)) => format!("order:{}", order.as_str()),
        (None, None, None) => return None,
    };
    Some(CacheKey::Browse(format!("{}:{}", listing, query.limit)))
}

#[async_trait::async_trait]
impl CatalogProvider for JamendoProvider {
    async fn search_tracks(&self, query: &TrackQuery) -> AppResult<Vec<CandidateTrack>> {
        match cache_key(query) {
            Some(key) => cached!(self.cache, key, SEARCH_CACHE_TTL, self.search_uncached(query)),
            None => self.search_uncached(query).await,
        }
    }

    async fn fetch_track(&self, track_id: &str) -> AppResult<Option<CandidateTrack>> {
        // A miss is not cached: the track may be published later
        cached!(
            self.cache,
            CacheKey::Track(track_id.to_string()),
            TRACK_CACHE_TTL,
            self.fetch_track_uncached(track_id),
            Option::is_some
        )
    }

    fn name(&self) -> &'static str {
        "jamendo"
    }
}
