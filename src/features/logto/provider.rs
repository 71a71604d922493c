use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// A user record in the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub primary_email: Option<String>,
    #[serde(default)]
    pub primary_phone: Option<String>,
    /// Milliseconds since epoch
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub last_sign_in_at: Option<i64>,
    #[serde(default)]
    pub is_suspended: bool,
}

/// Data needed to register a new identity
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Operations the admin API needs from the identity provider.
///
/// Implemented by [`super::LogtoUsersClient`]; tests swap in an in-memory fake.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Every user known to the provider
    async fn list_users(&self) -> Result<Vec<IdentityUser>>;

    /// Returns Conflict if the email is already registered
    async fn create_user(&self, identity: NewIdentity) -> Result<IdentityUser>;

    /// Returns NotFound if the user does not exist
    async fn delete_user(&self, user_id: &str) -> Result<()>;

    async fn update_password(&self, user_id: &str, password: &str) -> Result<()>;
}
