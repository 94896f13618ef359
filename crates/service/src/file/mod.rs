//! File-backed domain stores, one per collection, plus the upload directory.

pub mod menu_store;
pub mod record_store;
pub mod region_store;
pub mod cart_store;
pub mod upload_store;
