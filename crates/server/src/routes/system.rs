use axum::{extract::State, response::Html, Json};
use common::types::{Health, SuccessResponse};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Kept for the admin UI, which calls it on first load. Nothing to do server-side.
pub async fn init() -> Json<SuccessResponse> {
    Json(SuccessResponse::with_message("Data initialized"))
}

/// Empty orders, reviews, restaurants and carts; menu and regions survive.
pub async fn reset(State(state): State<ServerState>) -> Result<Json<SuccessResponse>, JsonApiError> {
    state.stores.reset().await?;
    Ok(Json(SuccessResponse::with_message("Data reset")))
}

pub async fn frontend_missing() -> Html<&'static str> {
    Html(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Menu admin</title></head>\n<body>\n\
         <h1>Menu admin backend is running</h1>\n\
         <p>The frontend bundle was not found. Build it into the configured frontend directory \
         (default <code>dist</code>) and restart the server.</p>\n\
         <p>The JSON API is available under <code>/api</code>, uploaded images under <code>/uploads</code>.</p>\n\
         </body>\n</html>\n",
    )
}
