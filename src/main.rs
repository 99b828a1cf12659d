mod api;
mod app;
mod config;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;
mod session;

use anyhow::Result;
use std::sync::Arc;

use services::{GeminiClient, TextGenerator};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        model = %settings.gemini_model,
        "Starting SiteQuote backend"
    );

    if settings.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set - model calls will be rejected upstream");
    }

    // Create the generative model client
    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(
        &settings.gemini_base_url,
        &settings.gemini_api_key,
        &settings.gemini_model,
        settings.ai_timeout_seconds,
    )?);

    // Create application state
    let state = app::AppState::new(settings.clone(), generator);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
