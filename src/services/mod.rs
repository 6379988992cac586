pub mod favorites;
pub mod genre_preferences;
pub mod playlists;
pub mod providers;
pub mod recommendations;
pub mod track_catalog;

pub use favorites::FavoritesService;
pub use genre_preferences::GenrePreferenceExtractor;
pub use playlists::PlaylistService;
pub use recommendations::{recommend_for_user, RecommendationFetcher, RecommendationPage};
pub use track_catalog::TrackCatalogService;
