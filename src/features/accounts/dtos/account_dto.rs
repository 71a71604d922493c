use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::accounts::models::{Account, AccountRole};
use crate::features::reports::dtos::{InterventionDto, ReportDto};
use crate::features::reports::models::{InterventionStatus, ReportStatus};
use crate::shared::types::default_page;
use crate::shared::validation::{validate_not_blank, validate_password_strength, PHONE_REGEX};

// =============================================================================
// LIST
// =============================================================================

/// Query params for listing accounts
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AccountQueryParams {
    /// Only accounts with this role (all roles when omitted)
    pub role: Option<AccountRole>,
    /// Case-insensitive match on name, surname, email or phone
    pub search: Option<String>,
    /// Page number (1-indexed, clamped to the last page)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page (server default when omitted, max: 100)
    #[param(minimum = 1, maximum = 100)]
    pub page_size: Option<i64>,
}

/// Account as listed in the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: Uuid,
    pub auth_user_id: String,
    pub role: AccountRole,
    pub name: String,
    pub surname: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub authority_name: Option<String>,
    pub supervisor_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(a: Account) -> Self {
        Self {
            full_name: a.full_name(),
            id: a.id,
            auth_user_id: a.auth_user_id,
            role: a.role,
            name: a.name,
            surname: a.surname,
            email: a.email,
            phone: a.phone,
            authority_name: a.authority_name,
            supervisor_id: a.supervisor_id,
            is_active: a.is_active,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Counters shown on top of an account profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileStatsDto {
    pub total_reports: usize,
    pub resolved_reports: usize,
    pub open_interventions: usize,
    pub completed_interventions: usize,
}

impl ProfileStatsDto {
    pub fn compute(reports: &[ReportDto], interventions: &[InterventionDto]) -> Self {
        Self {
            total_reports: reports.len(),
            resolved_reports: reports
                .iter()
                .filter(|r| r.status == ReportStatus::Resolved)
                .count(),
            open_interventions: interventions
                .iter()
                .filter(|i| {
                    matches!(
                        i.status,
                        InterventionStatus::Assigned | InterventionStatus::InProgress
                    )
                })
                .count(),
            completed_interventions: interventions
                .iter()
                .filter(|i| i.status == InterventionStatus::Completed)
                .count(),
        }
    }
}

/// Account with its reports and intervention history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountProfileDto {
    pub account: AccountDto,
    pub supervisor: Option<AccountDto>,
    pub reports: Vec<ReportDto>,
    pub interventions: Vec<InterventionDto>,
    pub stats: ProfileStatsDto,
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Request DTO for updating profile fields (omitted fields are kept)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountDto {
    #[validate(
        length(min = 1, max = 128, message = "Name must be 1-128 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 128, message = "Surname must not exceed 128 characters"))]
    pub surname: Option<String>,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be a valid phone number"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Authority name must not exceed 255 characters"))]
    pub authority_name: Option<String>,
}

impl UpdateAccountDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.authority_name.is_none()
    }
}

/// Request DTO for creating a field agent
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAgentDto {
    #[validate(
        length(min = 1, max = 128, message = "Name must be 1-128 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 128, message = "Surname must not exceed 128 characters"))]
    pub surname: Option<String>,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be a valid phone number"))]
    pub phone: Option<String>,

    #[validate(
        length(min = 8, max = 128, message = "Password must be 8-128 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,

    /// Operator supervising the agent; defaults to the caller's own account
    pub supervisor_id: Option<Uuid>,
}

/// Request DTO for setting a new password
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordDto {
    #[validate(
        length(min = 8, max = 128, message = "Password must be 8-128 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

/// Request DTO for changing an operator's authority level
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthorityDto {
    pub role: AccountRole,

    #[validate(
        length(min = 1, max = 255, message = "Authority name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub authority_name: Option<String>,
}

/// Result of deleting an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteAccountResponseDto {
    pub id: Uuid,
    /// False when the identity could not be removed; it will show up as an orphan
    pub identity_deleted: bool,
}
