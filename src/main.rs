//! Secret-Santa assignment service
//!
//! Main application entry point

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use secret_santa::{
    app::{create_router, shutdown_signal, AppState},
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService, ExchangeStore},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", secret_santa::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    // Run database migrations
    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let store: Arc<dyn ExchangeStore> = Arc::new(DatabaseService::new(db_pool));

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, store);
    let state = Arc::new(AppState::new(services));

    let router = create_router(state);

    let listener = TcpListener::bind(settings.bind_address()).await?;
    info!("Listening on {}", settings.bind_address());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Secret-Santa service stopped");
    Ok(())
}
