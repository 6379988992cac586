use std::collections::HashMap;
use std::sync::Arc;

use crate::{db::FavoritesStore, models::FavoriteRecord};

/// How many genres count as a user's "top" genres
pub const TOP_GENRE_COUNT: usize = 3;

/// Occurrence counts per genre, remembering first-seen order
#[derive(Debug, Default)]
pub struct GenreTally {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl GenreTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, genre: &str) {
        match self.index.get(genre) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(genre.to_string(), self.counts.len());
                self.counts.push((genre.to_string(), 1));
            }
        }
    }

    pub fn count(&self, genre: &str) -> usize {
        self.index.get(genre).map_or(0, |&slot| self.counts[slot].1)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Genres by descending count. Equal counts keep first-seen order.
    pub fn ranked(mut self) -> Vec<(String, usize)> {
        // sort_by is stable
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
    }

    /// The `limit` most frequent genres
    pub fn top(self, limit: usize) -> Vec<String> {
        self.ranked()
            .into_iter()
            .take(limit)
            .map(|(genre, _)| genre)
            .collect()
    }
}

/// Tallies the genres of `favorites`, skipping records whose stored genres are unusable
pub fn tally_genres(favorites: &[FavoriteRecord]) -> GenreTally {
    let mut tally = GenreTally::new();

    for favorite in favorites {
        match favorite.genres.tags() {
            Some(tags) => tags.iter().for_each(|genre| tally.record(genre)),
            None => {
                tracing::warn!(
                    record_id = %favorite.id,
                    track_id = %favorite.track_id,
                    track_name = %favorite.track_name,
                    "Favorite has unrecognized genres shape, skipping"
                );
            }
        }
    }

    tally
}

/// Derives a user's preferred genres from their favorites
///
/// Never fails: a missing user id, an empty favorites list and a store error all yield
/// an empty list, so callers treat "no preferences yet" the same way regardless of cause.
#[derive(Clone)]
pub struct GenrePreferenceExtractor {
    favorites: Arc<dyn FavoritesStore>,
}

impl GenrePreferenceExtractor {
    pub fn new(favorites: Arc<dyn FavoritesStore>) -> Self {
        Self { favorites }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_top_genres(&self, user_id: &str) -> Vec<String> {
        if user_id.trim().is_empty() {
            tracing::debug!("No user id, no genre preferences");
            return Vec::new();
        }

        let favorites = match self.favorites.favorites_by_user(user_id).await {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load favorites for genre ranking");
                return Vec::new();
            }
        };

        if favorites.is_empty() {
            return Vec::new();
        }

        let tally = tally_genres(&favorites);
        if tally.is_empty() {
            tracing::debug!(favorites = favorites.len(), "Favorites carry no usable genre tags");
            return Vec::new();
        }
        let top = tally.top(TOP_GENRE_COUNT);

        tracing::info!(
            favorites = favorites.len(),
            top_genres = ?top,
            "Top genres computed"
        );

        top
    }
}
