use std::sync::Arc;

use crate::{
    db::PlaylistStore,
    error::{AppError, AppResult},
    models::{Playlist, TrackSummary},
};

/// User playlists: create, list, delete, and edit the track list
///
/// A playlist that belongs to another user is reported as not found.
#[derive(Clone)]
pub struct PlaylistService {
    store: Arc<dyn PlaylistStore>,
}

fn require_user(user_id: &str) -> AppResult<()> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("User id is required".to_string()));
    }
    Ok(())
}

fn playlist_not_found(playlist_id: &str) -> AppError {
    AppError::NotFound(format!("Playlist {} not found", playlist_id))
}

impl PlaylistService {
    pub fn new(store: Arc<dyn PlaylistStore>) -> Self {
        Self { store }
    }

    pub async fn create_playlist(&self, user_id: &str, name: &str) -> AppResult<Playlist> {
        require_user(user_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput(
                "Playlist name cannot be empty".to_string(),
            ));
        }

        let playlist = self.store.create_playlist(user_id, name).await?;
        tracing::info!(playlist_id = %playlist.id, user_id = %user_id, "Playlist created");
        Ok(playlist)
    }

    pub async fn list_playlists(&self, user_id: &str) -> AppResult<Vec<Playlist>> {
        require_user(user_id)?;
        self.store.playlists_by_user(user_id).await
    }

    pub async fn delete_playlist(&self, user_id: &str, playlist_id: &str) -> AppResult<()> {
        self.owned_playlist(user_id, playlist_id).await?;
        self.store.delete_playlist(playlist_id).await?;
        Ok(())
    }

    /// Appends `track`. Adding a track that is already present leaves the playlist as is.
    /// The edit itself is atomic in the store, so concurrent adds are all kept.
    pub async fn add_track(
        &self,
        user_id: &str,
        playlist_id: &str,
        track: TrackSummary,
    ) -> AppResult<Playlist> {
        self.owned_playlist(user_id, playlist_id).await?;
        self.store
            .add_playlist_track(playlist_id, &track)
            .await?
            .ok_or_else(|| playlist_not_found(playlist_id))
    }

    pub async fn remove_track(
        &self,
        user_id: &str,
        playlist_id: &str,
        track_id: &str,
    ) -> AppResult<Playlist> {
        self.owned_playlist(user_id, playlist_id).await?;
        self.store
            .remove_playlist_track(playlist_id, track_id)
            .await?
            .ok_or_else(|| playlist_not_found(playlist_id))
    }

    async fn owned_playlist(&self, user_id: &str, playlist_id: &str) -> AppResult<Playlist> {
        require_user(user_id)?;
        match self.store.get_playlist(playlist_id).await? {
            Some(playlist) if playlist.user_id == user_id => Ok(playlist),
            _ => Err(playlist_not_found(playlist_id)),
        }
    }
}
