//! coldapi - HTTP server entry point

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coldapi::{
    api::{self, AppState},
    config::Config,
    services::ItemCatalog,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coldapi=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting coldapi...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Build the read-only item table
    let catalog = ItemCatalog::seeded()?;
    tracing::info!("Item catalog loaded: {} records", catalog.len());

    let state = AppState::new(catalog, config.upload.clone());

    // Build router
    let app = api::build_router(state, &config.server)?;

    // Start server
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
