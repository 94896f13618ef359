use crate::errors::ServiceError;
use async_trait::async_trait;

/// A collection that `POST /api/reset` empties.
#[async_trait]
pub trait ResettableStore: Send + Sync {
    fn collection(&self) -> &'static str;
    async fn reset(&self) -> Result<(), ServiceError>;
}
