mod compose;
mod config;
mod curation;
mod errors;
mod generation;
mod models;
mod persistence;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compose::sessions::SessionRegistry;
use crate::config::Config;
use crate::generation::client::GenerationClient;
use crate::persistence::tracker_client::TrackerClient;
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

    info!("Starting composer v{}", env!("CARGO_PKG_VERSION"));

    let tracker = TrackerClient::new(&config.tracker_url, config.http_timeout)?;
    info!("Tracker client initialized ({})", config.tracker_url);

    let generator = GenerationClient::new(&config.generator_url, config.http_timeout)?;
    info!("Generation client initialized ({})", config.generator_url);

    info!("Edits are saved after {:?} of inactivity", config.save_debounce);

    let state = AppState {
        config: config.clone(),
        items: Arc::new(tracker),
        generator: Arc::new(generator),
        sessions: SessionRegistry::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the view is served from a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
