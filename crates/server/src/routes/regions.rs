use axum::{extract::{Path, State}, Json};
use common::types::SuccessResponse;
use serde::Deserialize;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct RegionInput {
    pub name: String,
}

pub async fn list_regions(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(state.stores.regions.list().await)
}

/// Idempotent: an existing name is not added twice.
pub async fn create_region(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<RegionInput>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    state.stores.regions.create(input.name).await?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn rename_region(
    State(state): State<ServerState>,
    Path(old_name): Path<String>,
    ApiJson(input): ApiJson<RegionInput>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    state.stores.regions.rename(&old_name, input.name).await?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_region(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    state.stores.regions.delete(&name).await?;
    Ok(Json(SuccessResponse::ok()))
}
