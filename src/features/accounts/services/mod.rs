mod account_service;
pub mod listing;

pub use account_service::AccountService;
pub use listing::{AccountFilter, AccountPage};
