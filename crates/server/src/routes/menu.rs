use axum::{extract::State, Json};
use common::types::SuccessResponse;
use serde_json::Value;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub async fn get_menu(State(state): State<ServerState>) -> Json<Value> {
    Json(state.stores.menu.get().await)
}

/// 整体替换菜单
pub async fn replace_menu(
    State(state): State<ServerState>,
    ApiJson(menu): ApiJson<Value>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    state.stores.menu.replace(menu).await?;
    Ok(Json(SuccessResponse::ok()))
}
