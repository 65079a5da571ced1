//! Main entry point for the avatar generation service

use std::sync::Arc;

use avatar_gen_service::{
    api,
    config::Settings,
    provider::{ImageGenerator, RunwareClient},
    queue::{AmqpProducer, JobQueue},
    storage::{AvatarCache, ObjectStorage, S3ObjectStorage},
    store::{AvatarStore, PgStore},
    AppState,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .init();

    info!("Starting avatar generation service");

    // Load configuration; missing required values are fatal here
    let settings = Settings::load()?;
    settings.validate()?;
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // Database pool and schema creation at startup
    let pool = PgPoolOptions::new()
        .connect(&settings.database.url())
        .await?;
    PgStore::ensure_schema(&pool).await?;

    let store: Arc<dyn AvatarStore> = Arc::new(PgStore::new(pool));
    let generator: Arc<dyn ImageGenerator> = Arc::new(RunwareClient::new(&settings.provider)?);
    let queue: Arc<dyn JobQueue> = Arc::new(AmqpProducer::new(&settings.broker));
    let object_storage: Arc<dyn ObjectStorage> =
        Arc::new(S3ObjectStorage::new(&settings.object_store));
    let cache = Arc::new(AvatarCache::new(
        object_storage,
        settings.object_store.download_path.clone(),
    ));

    // Create application state
    let state = Arc::new(AppState {
        store,
        generator,
        queue,
        cache,
    });

    // Build the schema and the router
    let schema = api::build_schema(state);
    let app = api::routes::create_router(schema);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
