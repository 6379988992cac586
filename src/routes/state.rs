use std::sync::Arc;
use std::time::Duration;

use crate::{
    db::{FavoritesStore, PlaylistStore},
    services::{
        providers::CatalogProvider, FavoritesService, GenrePreferenceExtractor, PlaylistService,
        RecommendationFetcher, TrackCatalogService,
    },
};

/// Shared application state, handed to handlers as `State<Arc<AppState>>`
#[derive(Clone)]
pub struct AppState {
    pub genre_preferences: GenrePreferenceExtractor,
    pub recommendations: RecommendationFetcher,
    pub favorites: FavoritesService,
    pub playlists: PlaylistService,
    pub catalog: TrackCatalogService,
}

impl AppState {
    /// Wires every service to the given collaborators
    pub fn new(
        favorites: Arc<dyn FavoritesStore>,
        playlists: Arc<dyn PlaylistStore>,
        catalog: Arc<dyn CatalogProvider>,
        catalog_timeout: Duration,
    ) -> Self {
        Self {
            genre_preferences: GenrePreferenceExtractor::new(favorites.clone()),
            recommendations: RecommendationFetcher::new(
                favorites.clone(),
                catalog.clone(),
                catalog_timeout,
            ),
            favorites: FavoritesService::new(favorites, catalog.clone()),
            playlists: PlaylistService::new(playlists),
            catalog: TrackCatalogService::new(catalog),
        }
    }
}
