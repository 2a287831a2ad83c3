//! Application lifecycle: startup preparation and the HTTP server

pub mod lifetime;
pub mod modes;

pub use modes::{build_app, run_server};
