//! Bet service HTTP server binary.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin bet-server
//!
//! # Run with PostgreSQL repository
//! DATABASE_URL=postgresql://localhost:5432/postgres \
//!   cargo run --bin bet-server --features "postgres-repo"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `REPOSITORY_TYPE`: `postgres` or `local` (default: postgres when a database URL is set)
//! - `DATABASE_URL`: PostgreSQL connection string (required for postgres-repo feature)
//! - `REPOSITORY_CONFIG`: Path to a `repository.toml`, used instead of the variables above
//!
//! With none of these set, a `repository.toml` in the working directory (or
//! `backend/`, or the parent directory) is used; failing that, in-memory storage.
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bet_service::db::RepositoryFactory;
use bet_service::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting bet service HTTP server");

    let repository = match env::var("REPOSITORY_CONFIG") {
        Ok(path) => {
            info!("Loading repository configuration from {}", path);
            RepositoryFactory::from_config_file(&path).await?
        }
        Err(_) => RepositoryFactory::discover().await?,
    };
    info!("Repository initialized successfully");

    let state = AppState::new(repository);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
