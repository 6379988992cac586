use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{BrowseCategory, CandidateTrack, TrackQuery},
    services::providers::CatalogProvider,
};

pub const SEARCH_LIMIT: u32 = 10;
pub const FEATURED_LIMIT: u32 = 3;
pub const BROWSE_LIMIT: u32 = 10;

/// Catalog browsing for the UI
///
/// Delegates to the configured [`CatalogProvider`]. Failures reach the caller as errors.
#[derive(Clone)]
pub struct TrackCatalogService {
    catalog: Arc<dyn CatalogProvider>,
}

impl TrackCatalogService {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }

    pub async fn search(&self, keyword: &str) -> AppResult<Vec<CandidateTrack>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        self.catalog
            .search_tracks(&TrackQuery::by_keyword(keyword, SEARCH_LIMIT))
            .await
    }

    /// The most popular tracks of the catalog
    pub async fn featured(&self) -> AppResult<Vec<CandidateTrack>> {
        self.catalog
            .search_tracks(&BrowseCategory::Popular.to_query(FEATURED_LIMIT))
            .await
    }

    pub async fn browse(&self, category: &BrowseCategory) -> AppResult<Vec<CandidateTrack>> {
        self.catalog
            .search_tracks(&category.to_query(BROWSE_LIMIT))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::TrackOrder, services::providers::MockCatalogProvider};

    #[tokio::test]
    async fn test_search_trims_and_limits() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_tracks()
            .withf(|q| q.keyword.as_deref() == Some("night drive") && q.limit == SEARCH_LIMIT)
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let service = TrackCatalogService::new(Arc::new(catalog));

        tokio_test::assert_ok!(service.search("  night drive ").await);
    }

    #[tokio::test]
    async fn test_blank_search_rejected() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_tracks().never();
        let service = TrackCatalogService::new(Arc::new(catalog));

        let result = service.search("   ").await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_featured_asks_for_three_popular_tracks() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_tracks()
            .withf(|q| q.limit == FEATURED_LIMIT && q.order == Some(TrackOrder::PopularityTotal))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let service = TrackCatalogService::new(Arc::new(catalog));

        tokio_test::assert_ok!(service.featured().await);
    }

    #[tokio::test]
    async fn test_browse_error_propagates() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_tracks()
            .withf(|q| q.tag.as_deref() == Some("jazz") && q.limit == BROWSE_LIMIT)
            .returning(|_| Err(AppError::ExternalApi("unavailable".to_string())));
        let service = TrackCatalogService::new(Arc::new(catalog));

        let result = service.browse(&BrowseCategory::Tag("jazz".to_string())).await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
