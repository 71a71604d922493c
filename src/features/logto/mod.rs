//! Logto Management API integration.
//!
//! The identity provider owns credentials; the `accounts` table only stores
//! the Logto user id (`auth_user_id`).

pub mod provider;
pub mod token_manager;
pub mod users_client;

pub use provider::{IdentityProvider, IdentityUser, NewIdentity};
pub use token_manager::LogtoTokenManager;
pub use users_client::LogtoUsersClient;
