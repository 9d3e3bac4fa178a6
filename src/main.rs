use anyhow::Result;
use propertypulse::{db, web, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PropertyPulse web service");

    // Load configuration from environment
    let config = propertypulse::config::Config::load()?;
    tracing::info!(
        environment = ?config.environment,
        public_url = %config.public_url,
        database = %config.mongodb_database,
        "Configuration loaded"
    );

    // Connect the user store and ensure the unique email index
    let store = db::connect(&config).await?;
    tracing::info!("User store ready");

    let bind_address = config.bind_address();
    let state = Arc::new(AppState::new(config, store)?);

    let app = web::create_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("PropertyPulse listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
