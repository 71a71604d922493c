use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{
    ROLE_LOCAL_OPERATOR, ROLE_NATIONAL_OPERATOR, ROLE_REGIONAL_OPERATOR, ROLE_SUPER_ADMIN,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: String,
    /// Logto user id; matches `accounts.auth_user_id`
    pub sub: String,
    /// Session UID (only present for interactive OIDC flows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_uid: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Any authority level (local, regional, national) or super admin
    pub fn has_operator_access(&self) -> bool {
        self.is_super_admin()
            || self.has_role(ROLE_LOCAL_OPERATOR)
            || self.has_role(ROLE_REGIONAL_OPERATOR)
            || self.has_role(ROLE_NATIONAL_OPERATOR)
    }

    /// National operator or super admin
    pub fn has_national_access(&self) -> bool {
        self.is_super_admin() || self.has_role(ROLE_NATIONAL_OPERATOR)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::create_user_with_roles;

    #[test]
    fn test_operator_access_levels() {
        let local = create_user_with_roles(&["local_operator"]);
        assert!(local.has_operator_access());
        assert!(!local.has_national_access());

        let national = create_user_with_roles(&["national_operator"]);
        assert!(national.has_operator_access());
        assert!(national.has_national_access());

        let admin = create_user_with_roles(&["super_admin"]);
        assert!(admin.has_national_access());

        let citizen = create_user_with_roles(&["citizen"]);
        assert!(!citizen.has_operator_access());
        assert!(!citizen.has_national_access());
    }
}
