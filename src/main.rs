use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use gong_relay::{api, AppState, Config, SharedState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gong_relay=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env()?;
    info!("gong-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on {}:{}", config.host, config.port);
    info!("OAuth callback registered as {}", config.redirect_uri);

    // Build shared state
    let state: SharedState = Arc::new(AppState::new(config.clone()));

    // Build router
    let app = api::router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server ready ✓");
    axum::serve(listener, app).await?;

    Ok(())
}
