//! Stash-box instance registry.
//!
//! Endpoint and API-key records for external stash-box services, kept in
//! SQLite. Every write runs in its own transaction and returns the row as
//! re-read from the store.

pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod routes;
pub mod services;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use services::instances::StashBoxInstances;

#[derive(Clone)]
pub struct AppState {
    pub instances: StashBoxInstances,
}

async fn health() -> &'static str {
    "ok"
}

/// Assemble the HTTP application
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::build_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
