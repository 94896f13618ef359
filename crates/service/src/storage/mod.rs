//! Storage abstractions for service layer
//!
//! File-backed JSON collections and the id clock shared by the record stores.

pub mod json_store;
pub mod ids;
