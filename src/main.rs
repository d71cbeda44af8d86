use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use tribune::config::{Cli, Config};
use tribune::state::AppState;
use tribune::{db, routes, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;
    let db_path = config
        .db_path()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("database path was not resolved"))?;

    // Initialize database
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    let state = AppState::new(pool, config.clone());

    if cli.seed {
        seed::seed(&state.users, &state.posts)?;
    }

    let app = routes::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
