//! The six collections, opened once at startup from one data directory.

use std::{path::Path, sync::Arc};

use tracing::{error, info};

use crate::admin::resettable::ResettableStore;
use crate::errors::ServiceError;
use crate::file::{
    cart_store::CartStore, menu_store::MenuStore, record_store::RecordStore, region_store::RegionStore,
};

pub const MENU_FILE: &str = "menu.json";
pub const ORDERS_FILE: &str = "orders.json";
pub const REVIEWS_FILE: &str = "reviews.json";
pub const RESTAURANTS_FILE: &str = "restaurants.json";
pub const REGIONS_FILE: &str = "regions.json";
pub const CARTS_FILE: &str = "carts.json";

#[derive(Clone)]
pub struct DataStores {
    pub menu: Arc<MenuStore>,
    pub orders: Arc<RecordStore>,
    pub reviews: Arc<RecordStore>,
    pub restaurants: Arc<RecordStore>,
    pub regions: Arc<RegionStore>,
    pub carts: Arc<CartStore>,
}

impl DataStores {
    pub async fn open(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        let stores = Self {
            menu: MenuStore::new(dir.join(MENU_FILE)).await,
            orders: RecordStore::new("orders", dir.join(ORDERS_FILE)).await,
            reviews: RecordStore::new("reviews", dir.join(REVIEWS_FILE)).await,
            restaurants: RecordStore::new("restaurants", dir.join(RESTAURANTS_FILE)).await,
            regions: RegionStore::new(dir.join(REGIONS_FILE)).await,
            carts: CartStore::new(dir.join(CARTS_FILE)).await,
        };
        info!(data_dir = %dir.display(), "collections loaded");
        stores
    }

    /// Empty orders, reviews, restaurants and carts. Menu and regions are kept.
    /// Every collection is attempted even after a failure.
    pub async fn reset(&self) -> Result<(), ServiceError> {
        let targets: [&dyn ResettableStore; 4] = [
            &*self.orders,
            &*self.reviews,
            &*self.restaurants,
            &*self.carts,
        ];

        let mut failed = Vec::new();
        for target in targets {
            if let Err(e) = target.reset().await {
                error!(collection = target.collection(), error = %e, "reset failed");
                failed.push(target.collection());
            }
        }

        if failed.is_empty() {
            info!("data reset");
            Ok(())
        } else {
            Err(ServiceError::Persist(format!("failed to reset {}", failed.join(", "))))
        }
    }
}
