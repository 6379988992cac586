use crate::{
    error::AppResult,
    models::{FavoriteRecord, NewFavorite, Playlist, TrackSummary},
};

/// Persistence for favorite tracks
///
/// Lookups are by equality on user id and track id. Implementations return records in
/// insertion order; callers that need a different order sort explicitly.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    /// All favorites of one user
    async fn favorites_by_user(&self, user_id: &str) -> AppResult<Vec<FavoriteRecord>>;

    /// Favorites of one user for one track. More than one match means a duplicate
    /// slipped in before the read-before-write check existed.
    async fn favorites_by_user_and_track(
        &self,
        user_id: &str,
        track_id: &str,
    ) -> AppResult<Vec<FavoriteRecord>>;

    /// Persists a favorite and returns it with its assigned record id
    async fn add_favorite(&self, favorite: NewFavorite) -> AppResult<FavoriteRecord>;

    /// Deletes by record id. Deleting a missing record is not an error.
    async fn delete_favorite(&self, record_id: &str) -> AppResult<()>;
}

/// Persistence for user playlists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn create_playlist(&self, user_id: &str, name: &str) -> AppResult<Playlist>;

    /// Playlists of one user, oldest first
    async fn playlists_by_user(&self, user_id: &str) -> AppResult<Vec<Playlist>>;

    async fn get_playlist(&self, playlist_id: &str) -> AppResult<Option<Playlist>>;

    /// Appends `track` unless a track with the same id is present, as one atomic
    /// edit. Returns the updated playlist, `None` when it does not exist.
    async fn add_playlist_track(
        &self,
        playlist_id: &str,
        track: &TrackSummary,
    ) -> AppResult<Option<Playlist>>;

    /// Removes every entry of `track_id` as one atomic edit. Returns the updated
    /// playlist, `None` when it does not exist.
    async fn remove_playlist_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> AppResult<Option<Playlist>>;

    /// Returns whether a playlist was deleted
    async fn delete_playlist(&self, playlist_id: &str) -> AppResult<bool>;
}
