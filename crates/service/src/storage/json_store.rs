use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info, warn};

use crate::errors::ServiceError;

/// Read `path` as JSON, or return `default` when the file is absent or does
/// not parse. Failures are logged and never propagated so startup always
/// succeeds.
pub async fn load_or_default<T: DeserializeOwned>(path: &Path, default: T) -> T {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => {
                info!(path = %path.display(), "collection loaded from disk");
                value
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "collection file is not valid JSON; using default");
                default
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "collection file missing; using default");
            default
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read collection file; using default");
            default
        }
    }
}

/// Write `value` as pretty-printed JSON, replacing whatever `path` held.
pub async fn persist<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(value).map_err(|e| ServiceError::Persist(e.to_string()))?;
    fs::write(path, data)
        .await
        .map_err(|e| ServiceError::Persist(format!("{}: {}", path.display(), e)))
}

/// One JSON value kept in memory and mirrored to a file after every mutation.
///
/// The lock only protects the in-memory value. It is released before the
/// file is written, so two concurrent writers may persist in either order and
/// the last write wins. A failed persist leaves the mutation in memory.
#[derive(Clone)]
pub struct JsonStore<T> {
    inner: Arc<RwLock<T>>,
    file_path: PathBuf,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Load the collection at `path`, falling back to `default`. A missing file
    /// is created with the default value.
    pub async fn open<P: Into<PathBuf>>(path: P, default: T) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let existed = fs::try_exists(&file_path).await.unwrap_or(false);
        let value = load_or_default(&file_path, default).await;
        if !existed {
            if let Err(e) = persist(&file_path, &value).await {
                warn!(path = %file_path.display(), error = %e, "cannot write initial collection file");
            }
        }

        Arc::new(Self { inner: Arc::new(RwLock::new(value)), file_path })
    }

    /// Clone of the current value.
    pub async fn get(&self) -> T {
        self.inner.read().await.clone()
    }

    pub async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R + Send,
    {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Overwrite the whole value and persist.
    pub async fn replace(&self, value: T) -> Result<(), ServiceError> {
        let mut guard = self.inner.write().await;
        *guard = value;
        drop(guard);
        self.save().await
    }

    /// Apply a mutation and persist. When `f` fails nothing is written.
    pub async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> Result<R, ServiceError> + Send,
        R: Send,
    {
        let mut guard = self.inner.write().await;
        let out = f(&mut guard)?;
        drop(guard);
        self.save().await?;
        Ok(out)
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let snapshot = self.inner.read().await.clone();
        persist(&self.file_path, &snapshot).await.map_err(|e| {
            warn!(path = %self.file_path.display(), error = %e, "persist failed; in-memory value kept");
            e
        })
    }
}
