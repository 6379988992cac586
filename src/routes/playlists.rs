use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::AppState;
use crate::{
    error::AppResult,
    models::{CreatePlaylistRequest, Playlist, TrackSummary},
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Playlist>>> {
    let playlists = state.playlists.list_playlists(&user_id).await?;
    Ok(Json(playlists))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(request): Json<CreatePlaylistRequest>,
) -> AppResult<(StatusCode, Json<Playlist>)> {
    let playlist = state
        .playlists
        .create_playlist(&user_id, &request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((user_id, playlist_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .playlists
        .delete_playlist(&user_id, &playlist_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_track(
    State(state): State<Arc<AppState>>,
    Path((user_id, playlist_id)): Path<(String, String)>,
    Json(track): Json<TrackSummary>,
) -> AppResult<Json<Playlist>> {
    let playlist = state
        .playlists
        .add_track(&user_id, &playlist_id, track)
        .await?;
    Ok(Json(playlist))
}

pub async fn remove_track(
    State(state): State<Arc<AppState>>,
    Path((user_id, playlist_id, track_id)): Path<(String, String, String)>,
) -> AppResult<Json<Playlist>> {
    let playlist = state
        .playlists
        .remove_track(&user_id, &playlist_id, &track_id)
        .await?;
    Ok(Json(playlist))
}
