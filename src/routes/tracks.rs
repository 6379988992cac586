use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{BrowseCategory, CandidateTrack},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    category: String,
    value: Option<String>,
}

impl BrowseQuery {
    /// `new`, `popular`, `artist` and `tag`. The last two need a non-blank `value`.
    fn into_category(self) -> AppResult<BrowseCategory> {
        let value = self
            .value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        match (self.category.as_str(), value) {
            ("new", _) => Ok(BrowseCategory::NewReleases),
            ("popular", _) => Ok(BrowseCategory::Popular),
            ("artist", Some(name)) => Ok(BrowseCategory::Artist(name)),
            ("tag", Some(tag)) => Ok(BrowseCategory::Tag(tag)),
            ("artist" | "tag", None) => Err(AppError::InvalidInput(format!(
                "Category '{}' requires a value",
                self.category
            ))),
            (other, _) => Err(AppError::InvalidInput(format!(
                "Unknown browse category '{}'",
                other
            ))),
        }
    }
}

/// Handler for keyword search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<CandidateTrack>>> {
    let tracks = state.catalog.search(&params.q).await?;
    Ok(Json(tracks))
}

pub async fn featured(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<CandidateTrack>>> {
    let tracks = state.catalog.featured().await?;
    Ok(Json(tracks))
}

pub async fn browse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrowseQuery>,
) -> AppResult<Json<Vec<CandidateTrack>>> {
    let category = params.into_category()?;
    let tracks = state.catalog.browse(&category).await?;
    Ok(Json(tracks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(category: &str, value: Option<&str>) -> BrowseQuery {
        BrowseQuery {
            category: category.to_string(),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_browse_categories_parse() {
        assert_eq!(
            query("new", None).into_category().unwrap(),
            BrowseCategory::NewReleases
        );
        assert_eq!(
            query("artist", Some(" Skaut ")).into_category().unwrap(),
            BrowseCategory::Artist("Skaut".to_string())
        );
        assert_eq!(
            query("tag", Some("lofi")).into_category().unwrap(),
            BrowseCategory::Tag("lofi".to_string())
        );
    }

    #[test]
    fn test_browse_rejects_unknown_or_missing_value() {
        assert!(matches!(
            query("artist", Some("  ")).into_category(),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            query("charts", None).into_category(),
            Err(AppError::InvalidInput(_))
        ));
    }
}
