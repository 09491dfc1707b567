mod analysis;
mod config;
mod errors;
mod page;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Paper Evaluator v{}", env!("CARGO_PKG_VERSION"));

    // Initialize analysis client
    let client = AnalysisClient::new(&config.analysis_base_url, config.analysis_timeout)?;
    info!(
        "Analysis client initialized (endpoint: {}, timeout: {:?})",
        client.endpoint(),
        config.analysis_timeout
    );
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    // Build app state
    let state = AppState::new(config.clone(), Arc::new(client));

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
