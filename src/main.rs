//! daymatrix - HTTP server entry point.

use daymatrix::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file next to the binary is optional.
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daymatrix=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, api_key_configured={}",
        config.model,
        config.api_key.is_some()
    );
    if config.api_key.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set; /api/analyze will fail until it is configured"
        );
    }

    api::serve(config).await
}
