//! Service layer for business logic
//!
//! Everything here is independent of actix-web so it can be exercised
//! directly from tests.

pub mod geoip;
mod location;

pub use geoip::{CityRecord, GeoIpLookup, GeoIpProvider};
pub use location::*;
