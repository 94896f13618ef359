use axum::{extract::{Path, State}, Json};
use common::types::SuccessResponse;
use serde_json::Value;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

/// 购物车；无记录时返回 `[]`
pub async fn get_cart(State(state): State<ServerState>, Path(user_id): Path<String>) -> Json<Value> {
    Json(state.stores.carts.get(&user_id).await)
}

pub async fn put_cart(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    ApiJson(cart): ApiJson<Value>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    state.stores.carts.put(user_id, cart).await?;
    Ok(Json(SuccessResponse::ok()))
}
