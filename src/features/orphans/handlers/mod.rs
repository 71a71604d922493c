pub mod orphan_handler;

pub use orphan_handler::*;
