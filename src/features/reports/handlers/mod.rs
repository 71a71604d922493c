pub mod history_handler;

pub use history_handler::*;
