//! Coach Backend - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the chat API.

use coach_backend::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coach_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        model = %config.model,
        weather = config.weather.api_key.is_some(),
        strava = config.strava.refresh_token.is_some(),
        "Loaded configuration"
    );
    if config.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; model calls will fail");
    }

    // Start HTTP server
    info!("Starting server on {}:{}", config.host, config.port);

    api::serve(config).await?;

    Ok(())
}
