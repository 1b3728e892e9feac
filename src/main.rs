use std::sync::Arc;

use cocktail_favorites::{
    config::Config,
    db::{create_pool, run_migrations, FavoriteStore, PgFavoriteStore},
    routes::{create_router, AppState},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cocktail_favorites=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config).await?;
    run_migrations(&pool, &config).await?;

    let store: Arc<dyn FavoriteStore> = Arc::new(PgFavoriteStore::new(pool));
    tracing::info!(store = store.name(), "Favorite store ready");

    let app = create_router(Arc::new(AppState::new(store)));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Favorite cocktails service listening");

    axum::serve(listener, app).await?;

    Ok(())
}
