use std::{path::PathBuf, sync::Arc};

use serde_json::{json, Value};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::json_store::JsonStore;

/// Menu served before the first `PUT /api/menu`.
///
/// The menu is an untyped document (`{categories, dishes, ..}`); a dish's
/// `categoryId` is not checked against the category list.
pub fn seed_menu() -> Value {
    json!({
        "categories": [
            { "id": 1, "name": "热菜", "description": "精选热菜系列" },
            { "id": 2, "name": "凉菜", "description": "清爽凉菜系列" },
            { "id": 3, "name": "汤品", "description": "营养汤品系列" }
        ],
        "dishes": [
            {
                "id": 1,
                "categoryId": 1,
                "name": "宫保鸡丁",
                "description": "经典川菜，鸡肉嫩滑，花生香脆",
                "image": "https://images.unsplash.com/photo-1565299624946-b28f40a0ca4b?w=400&h=300&fit=crop",
                "customizations": {
                    "doneness": [],
                    "sauces": ["蒜蓉酱", "黑椒酱"],
                    "spiciness": ["不辣", "微辣", "中辣", "特辣"],
                    "extras": ["加蛋", "加蔬菜"]
                }
            }
        ]
    })
}

fn count(menu: &Value, key: &str) -> usize {
    menu.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

/// 菜单存储：整体读取、整体替换
#[derive(Clone)]
pub struct MenuStore {
    store: Arc<JsonStore<Value>>,
}

impl MenuStore {
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonStore::open(path, seed_menu()).await;
        Arc::new(Self { store })
    }

    pub async fn get(&self) -> Value {
        self.store.get().await
    }

    /// Replace the whole menu with `menu` as sent; nothing is merged or checked.
    pub async fn replace(&self, menu: Value) -> Result<(), ServiceError> {
        info!(categories = count(&menu, "categories"), dishes = count(&menu, "dishes"), "menu replaced");
        self.store.replace(menu).await
    }
}
