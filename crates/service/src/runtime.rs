//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the data and upload directories exist; warn when the frontend bundle is missing.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str, upload_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(frontend_dir, data_dir, upload_dir).await
}
