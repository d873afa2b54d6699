use anyhow::Context;
use tracing_subscriber::EnvFilter;

use portal_admin::fixtures::FixtureStore;
use portal_admin::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up PORTAL_FIXTURES, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = portal_admin::config::config();
    tracing::info!("Starting portal admin API in {:?} mode", config.environment);

    let store = FixtureStore::from_path(config.api.fixtures_path.as_deref())
        .context("failed to load fixtures")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    server::serve(listener, AppState::new(store)).await?;
    Ok(())
}
