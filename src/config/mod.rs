pub mod args;
mod structs;

pub use args::Args;
pub use structs::*;
