use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use stashbox::config::Config;
use stashbox::services::{db, instances::StashBoxInstances};
use stashbox::{AppState, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env();

    let pool = db::connect(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;

    let state = Arc::new(AppState {
        instances: StashBoxInstances::new(pool),
    });

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app(state)).await.context("Server failed")?;

    Ok(())
}
