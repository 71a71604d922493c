use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
    /// Dashboard uses these to show or hide operator-only actions
    pub can_manage_accounts: bool,
    pub can_manage_authorities: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            can_manage_accounts: user.has_operator_access(),
            can_manage_authorities: user.has_national_access(),
            account_id: user.account_id,
            sub: user.sub,
            roles: user.roles,
        }
    }
}
