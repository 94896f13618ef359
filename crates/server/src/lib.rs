pub mod routes;
pub mod startup;
pub mod state;
pub mod errors;
pub mod extract;

pub use startup::{build_app, run, run_with, serve};
