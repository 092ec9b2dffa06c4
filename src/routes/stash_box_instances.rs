//! Stash-box instance endpoints (/stash-box-instances/*)

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use crate::models::{InstanceId, NewStashBoxInstance, StashBoxInstance, StashBoxInstanceUpdate};
use crate::services::error::{LogErr, LogStoreErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/stash-box-instances",
            get(list_instances).post(create_instance),
        )
        .route(
            "/stash-box-instances/{id}",
            get(get_instance).put(update_instance).delete(destroy_instance),
        )
}

#[derive(Deserialize)]
struct UpdateInstanceRequest {
    endpoint: Option<String>,
    api_key: Option<String>,
}

fn parse_id(raw: &str) -> Result<InstanceId, StatusCode> {
    raw.parse::<InstanceId>().log_store("Parse instance id error")
}

/// GET /stash-box-instances - List all configured instances
async fn list_instances(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StashBoxInstance>>, StatusCode> {
    let instances = state
        .instances
        .list()
        .await
        .log_500("List stash-box instances error")?;

    Ok(Json(instances))
}

/// GET /stash-box-instances/{id}
async fn get_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StashBoxInstance>, StatusCode> {
    let id = parse_id(&id)?;

    let instance = state
        .instances
        .get(id)
        .await
        .log_store("Get stash-box instance error")?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(instance))
}

/// POST /stash-box-instances - Register a new instance
async fn create_instance(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewStashBoxInstance>,
) -> Result<(StatusCode, Json<StashBoxInstance>), StatusCode> {
    let instance = state
        .instances
        .create(payload)
        .await
        .log_store("Create stash-box instance error")?;

    Ok((StatusCode::CREATED, Json(instance)))
}

/// PUT /stash-box-instances/{id} - Replace the provided fields
async fn update_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInstanceRequest>,
) -> Result<Json<StashBoxInstance>, StatusCode> {
    let id = parse_id(&id)?;

    let instance = state
        .instances
        .update(StashBoxInstanceUpdate {
            id,
            endpoint: payload.endpoint,
            api_key: payload.api_key,
        })
        .await
        .log_store("Update stash-box instance error")?;

    Ok(Json(instance))
}

/// DELETE /stash-box-instances/{id}
async fn destroy_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<bool>, StatusCode> {
    let id = parse_id(&id)?;

    let destroyed = state
        .instances
        .destroy(id)
        .await
        .log_store("Destroy stash-box instance error")?;

    Ok(Json(destroyed))
}
