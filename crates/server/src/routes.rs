use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use service::file::upload_store::PUBLIC_PREFIX;

use crate::state::ServerState;

pub mod menu;
pub mod records;
pub mod regions;
pub mod carts;
pub mod uploads;
pub mod system;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the full application router: JSON API, uploaded files and the frontend bundle.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: impl AsRef<Path>) -> Router {
    let upload_body_limit = state.uploads.max_bytes() + MULTIPART_OVERHEAD;

    let api = Router::new()
        .route("/health", get(system::health))
        .route("/api/menu", get(menu::get_menu).put(menu::replace_menu))
        .route("/api/orders", get(records::list_orders).post(records::create_order))
        .route("/api/orders/:id", put(records::update_order))
        .route("/api/reviews", get(records::list_reviews).post(records::create_review))
        .route("/api/reviews/:id", delete(records::delete_review))
        .route("/api/cart/:user_id", get(carts::get_cart).put(carts::put_cart))
        .route("/api/restaurants", get(records::list_restaurants).post(records::create_restaurant))
        .route("/api/restaurants/regions", get(regions::list_regions).post(regions::create_region))
        .route(
            "/api/restaurants/regions/:name",
            put(regions::rename_region).delete(regions::delete_region),
        )
        .route(
            "/api/restaurants/:id",
            put(records::update_restaurant).delete(records::delete_restaurant),
        )
        .route(
            "/api/upload",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/api/upload/:filename", delete(uploads::delete_image))
        .route("/api/init", post(system::init))
        .route("/api/reset", post(system::reset));

    let with_uploads = api.nest_service(PUBLIC_PREFIX, ServeDir::new(state.uploads.dir()));

    // Non-API paths: the SPA bundle with index.html fallback, or a placeholder page.
    let frontend_dir = frontend_dir.as_ref();
    let app = if common::env::has_index_page(frontend_dir) {
        info!(frontend_dir = %frontend_dir.display(), "serving frontend bundle");
        let spa = ServeDir::new(frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")));
        with_uploads.fallback_service(spa)
    } else {
        with_uploads.fallback(system::frontend_missing)
    };

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
