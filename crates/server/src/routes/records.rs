//! Orders, reviews and restaurants: append-only lists of JSON objects with
//! server-assigned ids. Which operations each list exposes is decided by the
//! router.

use axum::{extract::{Path, State}, Json};
use common::types::SuccessResponse;
use service::errors::ServiceError;
use service::file::record_store::{parse_id, Record, RecordStore};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

async fn list(store: &RecordStore) -> Json<Vec<Record>> {
    Json(store.list().await)
}

async fn create(store: &RecordStore, fields: Record) -> Result<Json<Record>, JsonApiError> {
    Ok(Json(store.append(fields).await?))
}

async fn update(store: &RecordStore, raw_id: &str, patch: Record) -> Result<Json<Record>, JsonApiError> {
    let id = parse_id(raw_id).ok_or_else(|| ServiceError::not_found(store.collection()))?;
    Ok(Json(store.update_by_id(id, patch).await?))
}

// an id that does not parse matches nothing, which is still a success
async fn remove(store: &RecordStore, raw_id: &str) -> Result<Json<SuccessResponse>, JsonApiError> {
    if let Some(id) = parse_id(raw_id) {
        store.delete_by_id(id).await?;
    }
    Ok(Json(SuccessResponse::ok()))
}

pub async fn list_orders(State(state): State<ServerState>) -> Json<Vec<Record>> {
    list(&state.stores.orders).await
}

pub async fn create_order(
    State(state): State<ServerState>,
    ApiJson(fields): ApiJson<Record>,
) -> Result<Json<Record>, JsonApiError> {
    create(&state.stores.orders, fields).await
}

pub async fn update_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<Record>,
) -> Result<Json<Record>, JsonApiError> {
    update(&state.stores.orders, &id, patch).await
}

pub async fn list_reviews(State(state): State<ServerState>) -> Json<Vec<Record>> {
    list(&state.stores.reviews).await
}

pub async fn create_review(
    State(state): State<ServerState>,
    ApiJson(fields): ApiJson<Record>,
) -> Result<Json<Record>, JsonApiError> {
    create(&state.stores.reviews, fields).await
}

pub async fn delete_review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    remove(&state.stores.reviews, &id).await
}

pub async fn list_restaurants(State(state): State<ServerState>) -> Json<Vec<Record>> {
    list(&state.stores.restaurants).await
}

pub async fn create_restaurant(
    State(state): State<ServerState>,
    ApiJson(fields): ApiJson<Record>,
) -> Result<Json<Record>, JsonApiError> {
    create(&state.stores.restaurants, fields).await
}

pub async fn update_restaurant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<Record>,
) -> Result<Json<Record>, JsonApiError> {
    update(&state.stores.restaurants, &id, patch).await
}

pub async fn delete_restaurant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, JsonApiError> {
    remove(&state.stores.restaurants, &id).await
}
