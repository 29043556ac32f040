//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are typed
//! (`users::UsersError`, `kernel::AppError`).

mod config;
mod routes;

use anyhow::Context;
use axum::Router;
use config::ServerConfig;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use users::{PgUserRepository, users_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,users=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = run().await;
    if let Err(e) = &result {
        tracing::error!("Server has failed: {e:#}");
    }
    result
}

async fn run() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    // Database connection; failure here is fatal
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let users = users_router(PgUserRepository::new(pool.clone()));
    let app = routes::build_router(users, config.timeouts);

    let served = serve(app, &config).await;

    // Release the session on every exit path of the server
    pool.close().await;
    tracing::info!("Database connection closed");

    served
}

async fn serve(app: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, "Server has started");

    platform::serve(listener, app, config.timeouts, platform::shutdown_signal()).await;

    tracing::info!("Server shutdown complete");

    Ok(())
}
