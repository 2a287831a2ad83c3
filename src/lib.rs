//! ipinfo - where is this IP address?
//!
//! A small HTTP service that resolves the caller's IP address to country,
//! province, city, coordinates and time zone using an offline MaxMind
//! GeoLite2-City database. Private and local addresses are answered with a
//! localized "local network" label without touching the database.
//!
//! # Architecture
//! - `api`: actix-web handler and middleware
//! - `services`: GeoIP lookup and response model
//! - `utils`: address classification and client IP extraction
//! - `config`: TOML / environment configuration
//! - `runtime`: startup and server mode
//! - `system`: logging

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
