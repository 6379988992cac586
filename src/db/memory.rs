use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::store::{FavoritesStore, PlaylistStore},
    error::AppResult,
    models::{FavoriteRecord, NewFavorite, Playlist, TrackSummary},
};

/// Process-local store for favorites and playlists
///
/// Used for tests and for `STORAGE_BACKEND=memory`. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    favorites: RwLock<Vec<FavoriteRecord>>,
    playlists: RwLock<Vec<Playlist>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw records, bypassing the service layer. Lets callers load legacy
    /// shapes or duplicates that the toggle path would never write.
    pub async fn insert_favorites(&self, records: impl IntoIterator<Item = FavoriteRecord>) {
        self.favorites.write().await.extend(records);
    }
}

#[async_trait::async_trait]
impl FavoritesStore for MemoryStore {
    async fn favorites_by_user(&self, user_id: &str) -> AppResult<Vec<FavoriteRecord>> {
        let favorites = self.favorites.read().await;
        Ok(favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn favorites_by_user_and_track(
        &self,
        user_id: &str,
        track_id: &str,
    ) -> AppResult<Vec<FavoriteRecord>> {
        let favorites = self.favorites.read().await;
        Ok(favorites
            .iter()
            .filter(|f| f.user_id == user_id && f.track_id == track_id)
            .cloned()
            .collect())
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> AppResult<FavoriteRecord> {
        let record = favorite.into_record(Uuid::new_v4().to_string(), Utc::now());
        self.favorites.write().await.push(record.clone());
        Ok(record)
    }

    async fn delete_favorite(&self, record_id: &str) -> AppResult<()> {
        self.favorites.write().await.retain(|f| f.id != record_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlaylistStore for MemoryStore {
    async fn create_playlist(&self, user_id: &str, name: &str) -> AppResult<Playlist> {
        let playlist = Playlist {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            tracks: Vec::new(),
            created_at: Utc::now(),
        };
        self.playlists.write().await.push(playlist.clone());
        Ok(playlist)
    }

    async fn playlists_by_user(&self, user_id: &str) -> AppResult<Vec<Playlist>> {
        let playlists = self.playlists.read().await;
        Ok(playlists
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_playlist(&self, playlist_id: &str) -> AppResult<Option<Playlist>> {
        let playlists = self.playlists.read().await;
        Ok(playlists.iter().find(|p| p.id == playlist_id).cloned())
    }

    async fn add_playlist_track(
        &self,
        playlist_id: &str,
        track: &TrackSummary,
    ) -> AppResult<Option<Playlist>> {
        let mut playlists = self.playlists.write().await;
        Ok(playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .map(|playlist| {
                playlist.add_track(track.clone());
                playlist.clone()
            }))
    }

    async fn remove_playlist_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> AppResult<Option<Playlist>> {
        let mut playlists = self.playlists.write().await;
        Ok(playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .map(|playlist| {
                playlist.remove_track(track_id);
                playlist.clone()
            }))
    }

    async fn delete_playlist(&self, playlist_id: &str) -> AppResult<bool> {
        let mut playlists = self.playlists.write().await;
        let before = playlists.len();
        playlists.retain(|p| p.id != playlist_id);
        Ok(playlists.len() != before)
    }
}
