use std::{path::PathBuf, sync::Arc};

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::admin::resettable::ResettableStore;
use crate::errors::ServiceError;
use crate::storage::{ids::IdClock, json_store::JsonStore};

/// A loosely-typed JSON object with a server-assigned numeric `id`.
pub type Record = Map<String, Value>;

pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

/// Copy every top-level key of `patch` over `base`. Nested objects are
/// replaced, not merged.
pub fn shallow_merge(base: &mut Record, patch: Record) {
    for (key, value) in patch {
        base.insert(key, value);
    }
}

/// Parse an id path segment. Anything that is not an integer matches no record.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Ordered list of records persisted as one JSON array (orders, reviews,
/// restaurants).
pub struct RecordStore {
    collection: &'static str,
    store: Arc<JsonStore<Vec<Record>>>,
    ids: IdClock,
}

impl RecordStore {
    pub async fn new<P: Into<PathBuf>>(collection: &'static str, path: P) -> Arc<Self> {
        let store = JsonStore::open(path, Vec::new()).await;
        let ids = IdClock::new();
        store
            .read(|records| records.iter().filter_map(record_id).for_each(|id| ids.observe(id)))
            .await;
        Arc::new(Self { collection, store, ids })
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub async fn list(&self) -> Vec<Record> {
        self.store.get().await
    }

    /// Store `fields` under a fresh id. A client-supplied `id` is overwritten.
    pub async fn append(&self, fields: Record) -> Result<Record, ServiceError> {
        let mut record = fields;
        let id = self.ids.next_id();
        record.insert("id".into(), json!(id));

        let created = record.clone();
        self.store
            .update(move |records| {
                records.push(record);
                Ok(())
            })
            .await?;
        info!(collection = self.collection, id, "record created");
        Ok(created)
    }

    /// Shallow-merge `patch` into the first record carrying `id`.
    pub async fn update_by_id(&self, id: i64, patch: Record) -> Result<Record, ServiceError> {
        let collection = self.collection;
        let updated = self
            .store
            .update(move |records| {
                let existing = records
                    .iter_mut()
                    .find(|r| record_id(r) == Some(id))
                    .ok_or_else(|| ServiceError::not_found(collection))?;
                shallow_merge(existing, patch);
                Ok(existing.clone())
            })
            .await?;
        info!(collection, id, "record updated");
        Ok(updated)
    }

    /// Remove every record carrying `id`; returns how many were removed.
    pub async fn delete_by_id(&self, id: i64) -> Result<usize, ServiceError> {
        let removed = self
            .store
            .update(move |records| {
                let before = records.len();
                records.retain(|r| record_id(r) != Some(id));
                Ok(before - records.len())
            })
            .await?;
        debug!(collection = self.collection, id, removed, "records deleted");
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.store.replace(Vec::new()).await
    }
}

#[async_trait::async_trait]
impl ResettableStore for RecordStore {
    fn collection(&self) -> &'static str {
        self.collection
    }

    async fn reset(&self) -> Result<(), ServiceError> {
        self.clear().await
    }
}
