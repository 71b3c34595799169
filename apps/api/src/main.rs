mod config;
mod display;
mod errors;
mod form;
mod generator;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generator::HttpDocumentGenerator;
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

    info!("Starting cvform v{}", env!("CARGO_PKG_VERSION"));

    let generator = HttpDocumentGenerator::new(
        &config.generator_url,
        config.submission_encoding,
        config.generator_timeout,
    )?;
    info!(
        "Document generator at {} ({:?} submissions, {}s timeout)",
        config.generator_url,
        config.submission_encoding,
        config.generator_timeout.as_secs()
    );
    info!("Display theme: {:?}", config.display.theme);

    let state = AppState {
        config: config.clone(),
        generator: Arc::new(generator),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the form's host once it is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
