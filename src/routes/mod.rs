use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod favorites;
pub mod playlists;
pub mod recommendations;
pub mod state;
pub mod tracks;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        // Outermost first: the request id must exist before the trace span is made
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Preferences and recommendations
        .route("/users/:user_id/top-genres", get(recommendations::top_genres))
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommend),
        )
        // Favorites
        .route("/users/:user_id/favorites", get(favorites::list))
        .route("/users/:user_id/favorites/toggle", post(favorites::toggle))
        .route(
            "/users/:user_id/favorites/:track_id",
            delete(favorites::remove),
        )
        // Playlists
        .route(
            "/users/:user_id/playlists",
            get(playlists::list).post(playlists::create),
        )
        .route(
            "/users/:user_id/playlists/:playlist_id",
            delete(playlists::delete),
        )
        .route(
            "/users/:user_id/playlists/:playlist_id/tracks",
            post(playlists::add_track),
        )
        .route(
            "/users/:user_id/playlists/:playlist_id/tracks/:track_id",
            delete(playlists::remove_track),
        )
        // Catalog
        .route("/tracks/search", get(tracks::search))
        .route("/tracks/featured", get(tracks::featured))
        .route("/tracks/browse", get(tracks::browse))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
