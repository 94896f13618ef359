use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use serde_json::{json, Value};
use tracing::debug;

use crate::admin::resettable::ResettableStore;
use crate::errors::ServiceError;
use crate::storage::json_store::JsonStore;

/// 购物车：`user_id -> cart`, each cart an opaque JSON value.
#[derive(Clone)]
pub struct CartStore {
    store: Arc<JsonStore<BTreeMap<String, Value>>>,
}

impl CartStore {
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonStore::open(path, BTreeMap::new()).await;
        Arc::new(Self { store })
    }

    /// Stored cart for `user_id`, or an empty array when there is none.
    pub async fn get(&self, user_id: &str) -> Value {
        self.store
            .read(|carts| carts.get(user_id).cloned())
            .await
            .unwrap_or_else(|| json!([]))
    }

    pub async fn put(&self, user_id: String, cart: Value) -> Result<(), ServiceError> {
        debug!(%user_id, "cart replaced");
        self.store
            .update(move |carts| {
                carts.insert(user_id, cart);
                Ok(())
            })
            .await
    }

    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.store.replace(BTreeMap::new()).await
    }
}

#[async_trait::async_trait]
impl ResettableStore for CartStore {
    fn collection(&self) -> &'static str {
        "carts"
    }

    async fn reset(&self) -> Result<(), ServiceError> {
        self.clear().await
    }
}
