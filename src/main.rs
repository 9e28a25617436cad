use std::sync::Arc;

use artscope_api::{
    config::Config,
    create_router,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle, PgArtworkStore},
    services::ArtworkStore,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artscope_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let store: Arc<dyn ArtworkStore> = Arc::new(PgArtworkStore::new(pool));

    let (cache, cache_handle) = connect_cache(&config).await?;

    let app = create_router(AppState::from_config(store, cache, &config));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

/// Connects the dictionary cache; the service runs uncached if Redis is unreachable
async fn connect_cache(
    config: &Config,
) -> anyhow::Result<(Option<Cache>, Option<CacheWriterHandle>)> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        tracing::info!("REDIS_URL not set, dictionary cache disabled");
        return Ok((None, None));
    };

    let client = create_redis_client(redis_url)?;
    match Cache::connect(client).await {
        Ok((cache, handle)) => Ok((Some(cache), Some(handle))),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, dictionary cache disabled");
            Ok((None, None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
