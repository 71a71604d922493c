use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Citizen,
    LocalOperator,
    RegionalOperator,
    NationalOperator,
    Agent,
}

impl AccountRole {
    /// Local, regional or national authority
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            AccountRole::LocalOperator | AccountRole::RegionalOperator | AccountRole::NationalOperator
        )
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Citizen => write!(f, "citizen"),
            AccountRole::LocalOperator => write!(f, "local_operator"),
            AccountRole::RegionalOperator => write!(f, "regional_operator"),
            AccountRole::NationalOperator => write!(f, "national_operator"),
            AccountRole::Agent => write!(f, "agent"),
        }
    }
}

/// Database model for account
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    /// Logto user id
    pub auth_user_id: String,
    pub role: AccountRole,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub authority_name: Option<String>,
    pub supervisor_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        match self.surname.as_deref().map(str::trim) {
            Some(surname) if !surname.is_empty() => format!("{} {}", self.name, surname),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_roles() {
        assert!(AccountRole::LocalOperator.is_operator());
        assert!(AccountRole::RegionalOperator.is_operator());
        assert!(AccountRole::NationalOperator.is_operator());
        assert!(!AccountRole::Agent.is_operator());
        assert!(!AccountRole::Citizen.is_operator());
    }

    #[test]
    fn test_role_serde_matches_display() {
        for role in [
            AccountRole::Citizen,
            AccountRole::LocalOperator,
            AccountRole::RegionalOperator,
            AccountRole::NationalOperator,
            AccountRole::Agent,
        ] {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json, serde_json::Value::String(role.to_string()));
        }
    }
}
