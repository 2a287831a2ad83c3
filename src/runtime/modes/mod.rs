//! Execution modes
//!
//! The service only has a server mode.

pub mod server;

pub use server::{build_app, run_server};
