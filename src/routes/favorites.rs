use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::AppState;
use crate::{
    error::AppResult,
    models::{FavoriteRecord, FavoriteToggle, TrackSummary},
};

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<FavoriteRecord>>> {
    let favorites = state.favorites.list_favorites(&user_id).await?;
    Ok(Json(favorites))
}

/// Handler for the favorite button. `201` when the track was added, `200` when removed.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(track): Json<TrackSummary>,
) -> AppResult<(StatusCode, Json<FavoriteToggle>)> {
    let outcome = state.favorites.toggle_favorite(&user_id, &track).await?;
    let status = match outcome {
        FavoriteToggle::Added { .. } => StatusCode::CREATED,
        FavoriteToggle::Removed { .. } => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path((user_id, track_id)): Path<(String, String)>,
) -> AppResult<Json<RemovedResponse>> {
    let removed = state.favorites.remove_favorite(&user_id, &track_id).await?;
    Ok(Json(RemovedResponse { removed }))
}
