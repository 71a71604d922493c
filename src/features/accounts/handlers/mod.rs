pub mod account_handler;
pub mod agent_handler;

pub use account_handler::*;
pub use agent_handler::*;
