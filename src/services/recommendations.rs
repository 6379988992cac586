use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;

use crate::{
    db::FavoritesStore,
    error::{AppError, AppResult},
    models::{CandidateTrack, TrackQuery},
    services::{genre_preferences::GenrePreferenceExtractor, providers::CatalogProvider},
};

/// Raw candidates requested per catalog call. Three times the final size leaves
/// room for exclusion and genre filtering.
pub const CANDIDATE_POOL_SIZE: u32 = 30;

/// Upper bound on recommendations returned per call
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Catalog tag spellings folded into a canonical genre before matching
pub const GENRE_SYNONYMS: [(&str, &str); 9] = [
    ("poprock", "pop"),
    ("indie", "pop"),
    ("electro", "electronic"),
    ("electropop", "electronic"),
    ("house", "electronic"),
    ("dance", "electronic"),
    ("countryrock", "country"),
    ("folk", "country"),
    ("funkyhouse", "electronic"),
];

/// Canonical bucket for a catalog tag; unknown tags pass through
pub fn normalize_genre(tag: &str) -> &str {
    GENRE_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == tag)
        .map_or(tag, |(_, canonical)| *canonical)
}

/// Whether any of the track's normalized tags is one of `genres`
pub fn matches_genres(track: &CandidateTrack, genres: &[String]) -> bool {
    track
        .genre_tags
        .iter()
        .map(|tag| normalize_genre(tag))
        .any(|tag| genres.iter().any(|genre| genre == tag))
}

/// Drops favorites and off-genre candidates, then shuffles with a PRNG seeded by
/// `seed` and keeps at most [`MAX_RECOMMENDATIONS`]
pub fn select_recommendations(
    candidates: Vec<CandidateTrack>,
    favorite_ids: &HashSet<String>,
    genres: &[String],
    seed: u64,
) -> Vec<CandidateTrack> {
    let mut selected: Vec<CandidateTrack> = candidates
        .into_iter()
        .filter(|track| !favorite_ids.contains(&track.id))
        .filter(|track| matches_genres(track, genres))
        .collect();

    // SliceRandom::shuffle is a Fisher-Yates shuffle
    let mut rng = StdRng::seed_from_u64(seed);
    selected.shuffle(&mut rng);
    selected.truncate(MAX_RECOMMENDATIONS);
    selected
}

/// Fetches genre-matched tracks the user has not favorited yet
///
/// Every failure (store, catalog, timeout) is logged and turned into an empty list.
#[derive(Clone)]
pub struct RecommendationFetcher {
    favorites: Arc<dyn FavoritesStore>,
    catalog: Arc<dyn CatalogProvider>,
    catalog_timeout: Duration,
}

impl RecommendationFetcher {
    pub fn new(
        favorites: Arc<dyn FavoritesStore>,
        catalog: Arc<dyn CatalogProvider>,
        catalog_timeout: Duration,
    ) -> Self {
        Self {
            favorites,
            catalog,
            catalog_timeout,
        }
    }

    /// Up to [`MAX_RECOMMENDATIONS`] tracks tagged with one of `top_genres`.
    ///
    /// Without a user id nothing is excluded. `seed` is forwarded to the catalog and
    /// drives the local shuffle, so a fixed seed gives a fixed order.
    #[tracing::instrument(skip(self, top_genres), fields(genres = ?top_genres))]
    pub async fn get_recommended_tracks(
        &self,
        user_id: Option<&str>,
        top_genres: &[String],
        offset: u32,
        seed: u64,
    ) -> Vec<CandidateTrack> {
        if top_genres.is_empty() {
            tracing::debug!("No genres, skipping catalog query");
            return Vec::new();
        }

        match self.try_recommend(user_id, top_genres, offset, seed).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!(error = %e, provider = self.catalog.name(), "Recommendation fetch failed");
                Vec::new()
            }
        }
    }

    async fn try_recommend(
        &self,
        user_id: Option<&str>,
        top_genres: &[String],
        offset: u32,
        seed: u64,
    ) -> AppResult<Vec<CandidateTrack>> {
        let favorite_ids = self.favorite_ids(user_id).await?;

        let query = TrackQuery::by_genres(top_genres, CANDIDATE_POOL_SIZE, offset, seed);
        let candidates = tokio::time::timeout(self.catalog_timeout, self.catalog.search_tracks(&query))
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "catalog search exceeded {}s",
                    self.catalog_timeout.as_secs_f32()
                ))
            })??;

        let candidate_count = candidates.len();
        let tracks = select_recommendations(candidates, &favorite_ids, top_genres, seed);

        tracing::info!(
            candidates = candidate_count,
            excluded_favorites = favorite_ids.len(),
            returned = tracks.len(),
            "Recommendations selected"
        );

        Ok(tracks)
    }

    async fn favorite_ids(&self, user_id: Option<&str>) -> AppResult<HashSet<String>> {
        let Some(user_id) = user_id.filter(|id| !id.trim().is_empty()) else {
            return Ok(HashSet::new());
        };

        let favorites = self.favorites.favorites_by_user(user_id).await?;
        Ok(favorites.into_iter().map(|f| f.track_id).collect())
    }
}

/// One page of recommendations together with the inputs that produced it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationPage {
    pub top_genres: Vec<String>,
    pub tracks: Vec<CandidateTrack>,
    pub offset: u32,
    pub seed: u64,
}

/// Top genres first, then recommendations for them
pub async fn recommend_for_user(
    extractor: &GenrePreferenceExtractor,
    fetcher: &RecommendationFetcher,
    user_id: &str,
    offset: u32,
    seed: u64,
) -> RecommendationPage {
    let top_genres = extractor.get_top_genres(user_id).await;
    let tracks = fetcher
        .get_recommended_tracks(Some(user_id), &top_genres, offset, seed)
        .await;

    RecommendationPage {
        top_genres,
        tracks,
        offset,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::store::MockFavoritesStore,
        models::{FavoriteRecord, StoredGenres},
        services::providers::MockCatalogProvider,
    };
    use chrono::Utc;

    fn track(id: &str, tags: &[&str]) -> CandidateTrack {
        CandidateTrack {
            id: id.to_string(),
            name: format!("Track {}", id),
            artist_name: "Artist".to_string(),
            audio_url: format!("https://cdn.example/{}.mp3", id),
            album_image: None,
            album_name: None,
            duration: 200,
            genre_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn favorite(track_id: &str) -> FavoriteRecord {
        FavoriteRecord {
            id: format!("rec-{}", track_id),
            user_id: "u1".to_string(),
            track_id: track_id.to_string(),
            track_name: "Fav".to_string(),
            track_artist: "Artist".to_string(),
            track_url: "https://cdn.example/fav.mp3".to_string(),
            album_image: None,
            duration: 100,
            genres: StoredGenres::Flat(vec!["rock".to_string()]),
            created_at: Utc::now(),
        }
    }

    fn genres(names: &[&str]) -> Vec<String> {
        names.iter().map(|g| g.to_string()).collect()
    }

    fn store_with(favorites: Vec<FavoriteRecord>) -> MockFavoritesStore {
        let mut store = MockFavoritesStore::new();
        store
            .expect_favorites_by_user()
            .returning(move |_| Ok(favorites.clone()));
        store
    }

    fn catalog_with(tracks: Vec<CandidateTrack>) -> MockCatalogProvider {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_tracks()
            .returning(move |_| Ok(tracks.clone()));
        catalog.expect_name().return_const("mock");
        catalog
    }

    fn fetcher(store: MockFavoritesStore, catalog: MockCatalogProvider) -> RecommendationFetcher {
        RecommendationFetcher::new(Arc::new(store), Arc::new(catalog), Duration::from_secs(5))
    }

    #[test]
    fn test_normalize_genre_synonyms() {
        assert_eq!(normalize_genre("indie"), "pop");
        assert_eq!(normalize_genre("poprock"), "pop");
        assert_eq!(normalize_genre("house"), "electronic");
        assert_eq!(normalize_genre("funkyhouse"), "electronic");
        assert_eq!(normalize_genre("folk"), "country");
        assert_eq!(normalize_genre("rock"), "rock");
    }

    #[test]
    fn test_indie_matches_pop() {
        assert!(matches_genres(&track("1", &["indie"]), &genres(&["pop"])));
        assert!(!matches_genres(&track("1", &["indie"]), &genres(&["rock"])));
        assert!(!matches_genres(&track("1", &[]), &genres(&["pop"])));
    }

    #[test]
    fn test_select_excludes_favorites_and_off_genre() {
        let candidates = vec![
            track("1", &["rock"]),
            track("2", &["jazz"]),
            track("3", &["poprock"]),
            track("4", &["rock"]),
        ];
        let favorite_ids: HashSet<String> = ["4".to_string()].into_iter().collect();

        let selected =
            select_recommendations(candidates, &favorite_ids, &genres(&["rock", "pop"]), 7);

        let mut ids: Vec<&str> = selected.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_select_caps_at_ten() {
        let candidates: Vec<CandidateTrack> =
            (0..30).map(|i| track(&i.to_string(), &["rock"])).collect();

        let selected = select_recommendations(candidates, &HashSet::new(), &genres(&["rock"]), 1);
        assert_eq!(selected.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_select_is_deterministic_per_seed() {
        let candidates: Vec<CandidateTrack> =
            (0..20).map(|i| track(&i.to_string(), &["rock"])).collect();
        let genres = genres(&["rock"]);

        let first = select_recommendations(candidates.clone(), &HashSet::new(), &genres, 42);
        let second = select_recommendations(candidates, &HashSet::new(), &genres, 42);

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_genres_skips_catalog() {
        let mut store = MockFavoritesStore::new();
        store.expect_favorites_by_user().never();
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_tracks().never();

        let fetcher = fetcher(store, catalog);
        let tracks = fetcher.get_recommended_tracks(Some("u1"), &[], 0, 1).await;

        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_query_uses_genres_offset_and_seed() {
        let store = store_with(Vec::new());
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_tracks()
            .withf(|query| {
                query.genre_tags == vec!["rock".to_string(), "pop".to_string()]
                    && query.limit == CANDIDATE_POOL_SIZE
                    && query.offset == 20
                    && query.seed == Some(99)
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));
        catalog.expect_name().return_const("mock");

        let fetcher = fetcher(store, catalog);
        fetcher
            .get_recommended_tracks(Some("u1"), &genres(&["rock", "pop"]), 20, 99)
            .await;
    }

    #[tokio::test]
    async fn test_results_exclude_favorites_and_match_genres() {
        let store = store_with(vec![favorite("2"), favorite("5")]);
        let catalog = catalog_with(vec![
            track("1", &["rock"]),
            track("2", &["rock"]),
            track("3", &["indie"]),
            track("4", &["classical"]),
            track("5", &["pop"]),
            track("6", &["house", "rock"]),
        ]);
        let top = genres(&["rock", "pop"]);

        let tracks = fetcher(store, catalog)
            .get_recommended_tracks(Some("u1"), &top, 0, 3)
            .await;

        assert_eq!(tracks.len(), 3);
        for track in &tracks {
            assert!(track.id != "2" && track.id != "5");
            assert!(matches_genres(track, &top));
        }
    }

    #[tokio::test]
    async fn test_missing_user_means_no_exclusions() {
        let mut store = MockFavoritesStore::new();
        store.expect_favorites_by_user().never();
        let catalog = catalog_with(vec![track("1", &["rock"]), track("2", &["rock"])]);

        let tracks = fetcher(store, catalog)
            .get_recommended_tracks(None, &genres(&["rock"]), 0, 3)
            .await;

        assert_eq!(tracks.len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_failure_degrades_to_empty() {
        let store = store_with(Vec::new());
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_tracks()
            .returning(|_| Err(AppError::ExternalApi("503".to_string())));
        catalog.expect_name().return_const("mock");

        let tracks = fetcher(store, catalog)
            .get_recommended_tracks(Some("u1"), &genres(&["rock"]), 0, 3)
            .await;

        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_empty() {
        let mut store = MockFavoritesStore::new();
        store
            .expect_favorites_by_user()
            .returning(|_| Err(AppError::Internal("pool closed".to_string())));
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_tracks().never();
        catalog.expect_name().return_const("mock");

        let tracks = fetcher(store, catalog)
            .get_recommended_tracks(Some("u1"), &genres(&["rock"]), 0, 3)
            .await;

        assert!(tracks.is_empty());
    }

    struct SlowCatalog;

    #[async_trait::async_trait]
    impl CatalogProvider for SlowCatalog {
        async fn search_tracks(&self, _query: &TrackQuery) -> AppResult<Vec<CandidateTrack>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![track("1", &["rock"])])
        }

        async fn fetch_track(&self, _track_id: &str) -> AppResult<Option<CandidateTrack>> {
            Ok(None)
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_catalog_timeout_degrades_to_empty() {
        let fetcher = RecommendationFetcher::new(
            Arc::new(store_with(Vec::new())),
            Arc::new(SlowCatalog),
            Duration::from_secs(2),
        );

        let tracks = fetcher
            .get_recommended_tracks(Some("u1"), &genres(&["rock"]), 0, 3)
            .await;

        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_for_user_composes_extractor_and_fetcher() {
        let mut rock_fav = favorite("9");
        rock_fav.genres = StoredGenres::Flat(genres(&["rock", "indie"]));
        let store: Arc<dyn FavoritesStore> = Arc::new(store_with(vec![rock_fav]));
        let catalog = catalog_with(vec![track("1", &["rock"]), track("9", &["rock"])]);

        let extractor = GenrePreferenceExtractor::new(store.clone());
        let fetcher = RecommendationFetcher::new(store, Arc::new(catalog), Duration::from_secs(5));

        let page = recommend_for_user(&extractor, &fetcher, "u1", 0, 11).await;

        assert_eq!(page.top_genres, vec!["rock", "indie"]);
        assert_eq!(page.tracks.len(), 1);
        assert_eq!(page.tracks[0].id, "1");
        assert_eq!(page.seed, 11);
    }
}
