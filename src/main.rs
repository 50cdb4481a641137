use std::sync::Arc;
use tracing::info;

use genie::{config::GenieConfig, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = GenieConfig::from_env()?;
    let bind_addr = config.bind_addr;

    info!("Starting Genie server");
    info!("Google search URL: {}", config.endpoints.google_search_url);
    info!("YouTube search URL: {}", config.endpoints.youtube_search_url);
    info!(
        "OpenAI base URL: {} (model {})",
        config.endpoints.openai_base_url, config.endpoints.openai_model
    );

    let state = Arc::new(AppState::new(config)?);
    info!("Dispatch mode: {:?}", state.dispatcher.mode());

    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Genie listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
