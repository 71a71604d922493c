use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::Confirmed;
use crate::features::auth::guards::{RequireNationalOperator, RequireOperator};
use crate::features::orphans::dtos::{BulkDeleteOrphansResponseDto, OrphanIdentityDto};
use crate::features::orphans::services::OrphanService;
use crate::shared::types::{ApiResponse, Meta};

/// List identities that have no account
#[utoipa::path(
    get,
    path = "/api/admin/orphans",
    responses(
        (status = 200, description = "Orphan identities", body = ApiResponse<Vec<OrphanIdentityDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required"),
        (status = 502, description = "Identity provider error")
    ),
    tag = "orphans",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_orphans(
    RequireOperator(_user): RequireOperator,
    State(service): State<Arc<OrphanService>>,
) -> Result<Json<ApiResponse<Vec<OrphanIdentityDto>>>> {
    let orphans = service.list_orphans().await?;
    let total = orphans.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(orphans),
        None,
        Some(Meta::total(total)),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orphans/{auth_user_id}",
    params(
        ("auth_user_id" = String, Path, description = "Logto user ID"),
        ("confirm" = bool, Query, description = "Must be true")
    ),
    responses(
        (status = 200, description = "Orphan identity deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required, or protected identity"),
        (status = 404, description = "Identity not found"),
        (status = 409, description = "Identity belongs to an account"),
        (status = 428, description = "Confirmation required")
    ),
    tag = "orphans",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_orphan(
    RequireOperator(_user): RequireOperator,
    _confirmed: Confirmed,
    State(service): State<Arc<OrphanService>>,
    Path(auth_user_id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_orphan(&auth_user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Orphan identity deleted".to_string()),
        None,
    )))
}

/// Delete every orphan identity
///
/// Individual failures do not stop the run; they are listed in `failures`.
#[utoipa::path(
    delete,
    path = "/api/admin/orphans",
    params(
        ("confirm" = bool, Query, description = "Must be true")
    ),
    responses(
        (status = 200, description = "Cleanup tally", body = ApiResponse<BulkDeleteOrphansResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - National operator access required"),
        (status = 428, description = "Confirmation required"),
        (status = 502, description = "Identity provider error")
    ),
    tag = "orphans",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_all_orphans(
    RequireNationalOperator(_user): RequireNationalOperator,
    _confirmed: Confirmed,
    State(service): State<Arc<OrphanService>>,
) -> Result<Json<ApiResponse<BulkDeleteOrphansResponseDto>>> {
    let tally = service.delete_all_orphans().await?;
    let message = format!(
        "Deleted {} of {} orphan identities ({} failed)",
        tally.deleted, tally.total_orphans, tally.failed
    );
    Ok(Json(ApiResponse::success(Some(tally), Some(message), None)))
}
