//! Persistence layer for the menu admin backend.
//! - `storage`: generic JSON collection store and id clock.
//! - `file`: one store per collection plus the upload directory.
//! - `data_stores`: the collections opened together, with reset.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod admin;
pub mod data_stores;

pub use data_stores::DataStores;
pub use errors::ServiceError;
