mod config;
mod documents;
mod errors;
mod job_search;
mod llm_client;
mod pipeline;
mod routes;
mod session;
mod skills;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::job_search::TheirStackClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
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

    info!("Starting skillmatch API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::from_config(&config)?;
    info!(
        "LLM client initialized (provider: {:?}, model: {})",
        llm.provider(),
        llm.model()
    );

    let job_search = TheirStackClient::from_config(&config)?;
    info!(
        "Job search client initialized (country: {}, limit: {})",
        config.job_search_country, config.job_search_limit
    );

    let sessions = SessionStore::new();
    sessions.spawn_sweeper(
        Duration::from_secs(config.session_idle_ttl_secs),
        Duration::from_secs(config.session_sweep_interval_secs),
    );
    info!(
        "Session sweeper started (idle TTL: {}s)",
        config.session_idle_ttl_secs
    );

    let state = AppState {
        oracle: Arc::new(llm),
        job_search: Arc::new(job_search),
        sessions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
