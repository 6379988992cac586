//! Track catalog abstraction
//!
//! The catalog is the external source of playable tracks and their genre tags.
//! Everything that needs catalog data goes through [`CatalogProvider`] so the backend
//! can be swapped (or mocked) without touching the recommendation logic.

use crate::{
    error::AppResult,
    models::{CandidateTrack, TrackQuery},
};

pub mod jamendo;

pub use jamendo::JamendoProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search tracks matching `query`
    ///
    /// Results are in the catalog's own order. No de-duplication across pages is
    /// promised, in particular when the seed changes between calls.
    async fn search_tracks(&self, query: &TrackQuery) -> AppResult<Vec<CandidateTrack>>;

    /// Look up a single track with its genre tags. `None` when the catalog has no such id.
    async fn fetch_track(&self, track_id: &str) -> AppResult<Option<CandidateTrack>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
