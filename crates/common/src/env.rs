//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Create the data and upload directories; warn when the frontend bundle is missing.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str, upload_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend bundle not found; non-API routes will serve the placeholder page");
    }
    for dir in [data_dir, upload_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    info!(%data_dir, %upload_dir, "storage directories ready");
    Ok(())
}

/// Whether the frontend bundle has an entry page to fall back to.
pub fn has_index_page(frontend_dir: impl AsRef<Path>) -> bool {
    frontend_dir.as_ref().join("index.html").is_file()
}
