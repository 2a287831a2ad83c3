pub mod lookup;

pub use lookup::{LookupService, lookup_routes};
