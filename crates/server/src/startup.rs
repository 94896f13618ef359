use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;
use service::{file::upload_store::UploadStore, runtime, DataStores};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Prepare directories, load every collection and assemble the router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let storage = &cfg.storage;
    runtime::ensure_env(&storage.frontend_dir, &storage.data_dir, &storage.upload_dir).await?;

    let stores = DataStores::open(&storage.data_dir).await;
    let uploads = UploadStore::new(&storage.upload_dir, storage.max_upload_bytes).await?;
    let state = ServerState { stores, uploads: Arc::new(uploads) };

    Ok(routes::build_router(state, build_cors(), &storage.frontend_dir))
}

/// Serve `app` until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server drained");
    Ok(())
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

/// Build the app from `cfg` and serve it until Ctrl+C.
pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "server listening");
    info!("frontend: http://{addr}");
    info!("api endpoints: http://{addr}/api");
    serve(listener, app, ctrl_c()).await
}

/// Public entry: env, logging and config, then [`run_with`].
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();
    run_with(AppConfig::load_or_env()?).await
}
