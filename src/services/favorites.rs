use std::sync::Arc;

use crate::{
    db::FavoritesStore,
    error::{AppError, AppResult},
    models::{FavoriteRecord, FavoriteToggle, NewFavorite, TrackSummary},
    services::providers::CatalogProvider,
};

/// Adds, removes and lists favorite tracks
///
/// Unlike the recommender, errors here propagate: a user who clicks "favorite" needs
/// to know when it did not stick.
#[derive(Clone)]
pub struct FavoritesService {
    store: Arc<dyn FavoritesStore>,
    catalog: Arc<dyn CatalogProvider>,
}

fn require_user(user_id: &str) -> AppResult<()> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("User id is required".to_string()));
    }
    Ok(())
}

impl FavoritesService {
    pub fn new(store: Arc<dyn FavoritesStore>, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { store, catalog }
    }

    /// Favorites of a user, most recently added first
    pub async fn list_favorites(&self, user_id: &str) -> AppResult<Vec<FavoriteRecord>> {
        require_user(user_id)?;

        let mut favorites = self.store.favorites_by_user(user_id).await?;
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    /// Flips the favorite status of `track` for `user_id`
    ///
    /// Reads before writing so two toggles in a row return the store to where it
    /// started. Any duplicate records for the pair are removed together.
    #[tracing::instrument(skip(self, track), fields(track_id = %track.id))]
    pub async fn toggle_favorite(
        &self,
        user_id: &str,
        track: &TrackSummary,
    ) -> AppResult<FavoriteToggle> {
        require_user(user_id)?;
        if track.id.trim().is_empty() {
            return Err(AppError::InvalidInput("Track id is required".to_string()));
        }

        let existing = self
            .store
            .favorites_by_user_and_track(user_id, &track.id)
            .await?;

        if !existing.is_empty() {
            for record in &existing {
                self.store.delete_favorite(&record.id).await?;
            }
            tracing::info!(removed = existing.len(), "Favorite removed");
            return Ok(FavoriteToggle::Removed {
                track_id: track.id.clone(),
            });
        }

        let genres = match self.catalog.fetch_track(&track.id).await? {
            Some(details) => details.genre_tags,
            None => {
                tracing::warn!(
                    provider = self.catalog.name(),
                    "Track not found in catalog, storing favorite without genres"
                );
                Vec::new()
            }
        };

        let favorite = self
            .store
            .add_favorite(NewFavorite::from_track(user_id, track, genres))
            .await?;

        tracing::info!(record_id = %favorite.id, genres = ?favorite.genres.tags(), "Favorite added");

        Ok(FavoriteToggle::Added { favorite })
    }

    /// Removes every favorite record of `track_id`. Returns how many were removed.
    pub async fn remove_favorite(&self, user_id: &str, track_id: &str) -> AppResult<usize> {
        require_user(user_id)?;

        let existing = self
            .store
            .favorites_by_user_and_track(user_id, track_id)
            .await?;
        for record in &existing {
            self.store.delete_favorite(&record.id).await?;
        }

        Ok(existing.len())
    }
}
