// API Server Binary Entry Point
//
// Purpose: Load the crop model artifacts and serve the recommendation UI
// Usage: cargo run --bin api_server

use crop_recommender::{create_router, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_recommender=info,api_server=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting crop recommendation server...");

    // Configuration from environment variables
    let config = Config::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  CLASSIFIER_PATH: {:?}", config.models.classifier);
    tracing::info!("  MINMAX_SCALER_PATH: {:?}", config.models.primary_scaler);
    tracing::info!("  STANDARD_SCALER_PATH: {:?}", config.models.secondary_scaler);
    tracing::info!("  PORT: {}", config.port);

    // Missing or unreadable required artifacts stop the process here
    let state = AppState::load(&config.models)?;
    tracing::info!("Model artifacts loaded");

    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
