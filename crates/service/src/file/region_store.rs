use std::{path::PathBuf, sync::Arc};

use tracing::info;

use crate::errors::ServiceError;
use crate::storage::json_store::JsonStore;

pub fn default_regions() -> Vec<String> {
    vec!["南京".to_string(), "杭州".to_string()]
}

/// 地域列表：bare strings, unique on insert only.
#[derive(Clone)]
pub struct RegionStore {
    store: Arc<JsonStore<Vec<String>>>,
}

impl RegionStore {
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonStore::open(path, default_regions()).await;
        Arc::new(Self { store })
    }

    pub async fn list(&self) -> Vec<String> {
        self.store.get().await
    }

    /// Add `name` unless it is already present; returns whether it was added.
    pub async fn create(&self, name: String) -> Result<bool, ServiceError> {
        let added = self
            .store
            .update(move |regions| {
                if regions.contains(&name) {
                    return Ok(false);
                }
                regions.push(name);
                Ok(true)
            })
            .await?;
        info!(added, "region create");
        Ok(added)
    }

    /// Overwrite the first slot equal to `old_name`. `new_name` may already
    /// exist elsewhere; the list then holds it twice.
    pub async fn rename(&self, old_name: &str, new_name: String) -> Result<(), ServiceError> {
        let old = old_name.to_string();
        self.store
            .update(move |regions| {
                let slot = regions
                    .iter_mut()
                    .find(|r| **r == old)
                    .ok_or_else(|| ServiceError::not_found("region"))?;
                *slot = new_name;
                Ok(())
            })
            .await?;
        info!(old_name, "region renamed");
        Ok(())
    }

    /// Remove every entry equal to `name`; returns how many were removed.
    pub async fn delete(&self, name: &str) -> Result<usize, ServiceError> {
        let name = name.to_string();
        self.store
            .update(move |regions| {
                let before = regions.len();
                regions.retain(|r| *r != name);
                Ok(before - regions.len())
            })
            .await
    }
}
