pub mod ip;

pub use ip::{extract_client_ip, is_public_ip};
