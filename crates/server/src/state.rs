use std::sync::Arc;

use service::{file::upload_store::UploadStore, DataStores};

/// Router state: every handler reaches the collections through here.
#[derive(Clone)]
pub struct ServerState {
    pub stores: DataStores,
    pub uploads: Arc<UploadStore>,
}
