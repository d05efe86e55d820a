mod compiler;
mod config;
mod db;
mod errors;
mod github;
mod latex;
mod models;
mod publishing;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compiler::LatexOnlineClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::github::GitHubClient;
use crate::publishing::Publisher;
use crate::resume::store::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize GitHub contents client
    let github = GitHubClient::new(&config.github).context("Failed to build GitHub client")?;
    info!(
        "GitHub client initialized ({}/{})",
        config.github.owner, config.github.repo
    );

    // Initialize LaTeX compiler client
    let compiler =
        LatexOnlineClient::new(&config.compiler).context("Failed to build compiler client")?;
    info!(
        "Compiler client initialized ({}, timeout {}s)",
        config.compiler.base_url,
        config.compiler.timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        resumes: Arc::new(PgResumeStore::new(db)),
        publisher: Arc::new(Publisher::new(
            Arc::new(github),
            config.github.owner.clone(),
            config.github.repo.clone(),
        )),
        compiler: Arc::new(compiler),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
