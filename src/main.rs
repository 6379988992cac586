use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use melomix_api::{
    config::{Config, StorageBackend},
    db::{self, Cache, FavoritesStore, MemoryStore, PgStore, PlaylistStore},
    routes::{create_router, AppState},
    services::providers::{CatalogProvider, JamendoProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("melomix_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (favorites, playlists): (Arc<dyn FavoritesStore>, Arc<dyn PlaylistStore>) =
        match config.storage_backend {
            StorageBackend::Postgres => {
                let pool = db::create_pool(&config.database_url).await?;
                db::run_migrations(&pool).await?;
                tracing::info!("Using PostgreSQL storage");
                let store = Arc::new(PgStore::new(pool));
                (store.clone() as Arc<dyn FavoritesStore>, store as Arc<dyn PlaylistStore>)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage, data is lost on restart");
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn FavoritesStore>, store as Arc<dyn PlaylistStore>)
            }
        };

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            let client = db::create_redis_client(url).context("Invalid REDIS_URL")?;
            let (cache, handle) = Cache::new(client).await;
            tracing::info!("Catalog cache enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, catalog cache disabled");
            (None, None)
        }
    };

    let catalog: Arc<dyn CatalogProvider> = Arc::new(JamendoProvider::new(
        cache,
        config.jamendo_client_id.clone(),
        config.jamendo_api_url.clone(),
    ));

    let state = Arc::new(AppState::new(
        favorites,
        playlists,
        catalog,
        config.catalog_timeout(),
    ));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
