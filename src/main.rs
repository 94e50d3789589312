//! Storefront Catalog - category facets, filtering and search

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use storefront_catalog::{
    catalog::{InMemoryProductSource, PgProductSource, ProductSource},
    config::Config,
    facets::{FacetEngine, SchemaRegistry},
    http::{router, AppState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;

    let registry = match &config.schema_path {
        Some(path) => Arc::new(SchemaRegistry::from_json_file(path)?),
        None => Arc::new(SchemaRegistry::builtin().clone()),
    };
    tracing::info!(categories = registry.categories().count(), "attribute schemas loaded");

    let source: Arc<dyn ProductSource> = match (&config.database_url, &config.seed_path) {
        (Some(url), _) => {
            let db = PgPoolOptions::new().max_connections(config.max_connections).connect(url).await.context("connecting to DATABASE_URL")?;
            sqlx::migrate!("./migrations").run(&db).await?;
            Arc::new(PgProductSource::new(db, registry.clone()))
        }
        (None, Some(path)) => Arc::new(InMemoryProductSource::from_seed_file(path, &registry)?),
        (None, None) => {
            tracing::warn!("neither DATABASE_URL nor CATALOG_SEED_PATH is set, serving an empty catalog");
            Arc::new(InMemoryProductSource::default())
        }
    };

    let state = AppState { source, engine: Arc::new(FacetEngine::new(registry, config.locale.clone())) };
    let app = router(state);

    tracing::info!("Storefront catalog listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?, app).await?;
    Ok(())
}
