use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::accounts::{
    dtos as accounts_dtos, handlers as accounts_handlers, models as accounts_models,
};
use crate::features::auth;
use crate::features::orphans::{dtos as orphans_dtos, handlers as orphans_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Accounts
        accounts_handlers::list_accounts,
        accounts_handlers::get_account_profile,
        accounts_handlers::update_account,
        accounts_handlers::toggle_account_active,
        accounts_handlers::delete_account,
        accounts_handlers::update_account_password,
        accounts_handlers::update_account_authority,
        // Agents
        accounts_handlers::create_agent,
        // Orphans
        orphans_handlers::list_orphans,
        orphans_handlers::delete_orphan,
        orphans_handlers::delete_all_orphans,
        // History
        reports_handlers::list_resolution_history,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Accounts
            accounts_models::AccountRole,
            accounts_dtos::AccountDto,
            accounts_dtos::AccountProfileDto,
            accounts_dtos::ProfileStatsDto,
            accounts_dtos::UpdateAccountDto,
            accounts_dtos::CreateAgentDto,
            accounts_dtos::UpdatePasswordDto,
            accounts_dtos::UpdateAuthorityDto,
            accounts_dtos::DeleteAccountResponseDto,
            ApiResponse<Vec<accounts_dtos::AccountDto>>,
            ApiResponse<accounts_dtos::AccountDto>,
            ApiResponse<accounts_dtos::AccountProfileDto>,
            ApiResponse<accounts_dtos::DeleteAccountResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::InterventionStatus,
            reports_dtos::ReportDto,
            reports_dtos::ReportMediaDto,
            reports_dtos::InterventionDto,
            reports_dtos::ResolutionHistoryDto,
            ApiResponse<Vec<reports_dtos::ResolutionHistoryDto>>,
            // Orphans
            orphans_dtos::OrphanIdentityDto,
            orphans_dtos::OrphanDeletionFailureDto,
            orphans_dtos::BulkDeleteOrphansResponseDto,
            ApiResponse<Vec<orphans_dtos::OrphanIdentityDto>>,
            ApiResponse<orphans_dtos::BulkDeleteOrphansResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Current user"),
        (name = "accounts", description = "Account listing, profiles and mutations (operators)"),
        (name = "agents", description = "Field agent creation (operators)"),
        (name = "orphans", description = "Identities without an account"),
        (name = "history", description = "Resolved reports and their interventions"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Balungpisah Admin API",
        version = "0.1.0",
        description = "Account and agent administration for Balungpisah",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_admin_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/admin/accounts",
            "/api/admin/accounts/{id}",
            "/api/admin/accounts/{id}/active",
            "/api/admin/agents",
            "/api/admin/orphans",
            "/api/admin/orphans/{auth_user_id}",
            "/api/admin/history",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn test_swagger_info_modifier_overrides_info() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging Admin".to_string(),
            version: "9.9.9".to_string(),
            description: "staging".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Staging Admin");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
