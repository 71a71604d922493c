use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::logto::IdentityUser;

/// Identity provider user with no account row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrphanIdentityDto {
    /// Logto user id
    pub id: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub is_suspended: bool,
}

impl From<IdentityUser> for OrphanIdentityDto {
    fn from(u: IdentityUser) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            email: u.primary_email,
            phone: u.primary_phone,
            created_at: u.created_at.and_then(DateTime::<Utc>::from_timestamp_millis),
            last_sign_in_at: u.last_sign_in_at.and_then(DateTime::<Utc>::from_timestamp_millis),
            is_suspended: u.is_suspended,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrphanDeletionFailureDto {
    pub id: String,
    pub error: String,
}

/// Outcome of a bulk orphan cleanup; `deleted + failed == total_orphans`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteOrphansResponseDto {
    pub total_orphans: usize,
    pub deleted: usize,
    pub failed: usize,
    pub failures: Vec<OrphanDeletionFailureDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::identity_user;

    #[test]
    fn test_orphan_from_identity_converts_timestamps() {
        let dto = OrphanIdentityDto::from(identity_user("u-42"));
        assert_eq!(dto.id, "u-42");
        assert_eq!(dto.email.as_deref(), Some("u-42@example.org"));
        assert_eq!(
            dto.created_at.map(|t| t.to_rfc3339()),
            Some("2025-01-01T00:00:00+00:00".to_string())
        );
        assert!(dto.last_sign_in_at.is_none());
    }
}
