use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::services::{recommend_for_user, RecommendationPage};

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    #[serde(default)]
    pub offset: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopGenresResponse {
    pub top_genres: Vec<String>,
}

/// Handler for a user's top genres
pub async fn top_genres(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<TopGenresResponse> {
    let top_genres = state.genre_preferences.get_top_genres(&user_id).await;
    Json(TopGenresResponse { top_genres })
}

/// Handler for the recommendation feed
///
/// Without a `seed` the current time in milliseconds is used, so each fresh request
/// gets a different mix while a client can replay a page by echoing the seed back.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendationParams>,
) -> Json<RecommendationPage> {
    let seed = params
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().unsigned_abs());

    let page = recommend_for_user(
        &state.genre_preferences,
        &state.recommendations,
        &user_id,
        params.offset,
        seed,
    )
    .await;

    Json(page)
}
