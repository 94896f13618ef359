//! `menu-admin-server`: read config, start the runtime, serve until Ctrl+C.

use std::process::ExitCode;

use configs::AppConfig;
use tracing::{error, info};

fn build_runtime(cfg: &AppConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();
    std::panic::set_hook(Box::new(|info| {
        error!(event = "panic", pid = std::process::id(), message = %info, "menu admin server panicked");
    }));

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let runtime = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.server.port,
        data_dir = %cfg.storage.data_dir,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "menu admin server starting"
    );

    match runtime.block_on(server::run_with(cfg)) {
        Ok(()) => {
            info!(event = "stop", "menu admin server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(event = "run_failed", error = %e, "menu admin server failed");
            ExitCode::FAILURE
        }
    }
}
