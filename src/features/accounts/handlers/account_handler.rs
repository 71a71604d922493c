use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, Confirmed};
use crate::features::accounts::dtos::{
    AccountDto, AccountProfileDto, AccountQueryParams, DeleteAccountResponseDto,
    UpdateAccountDto, UpdateAuthorityDto, UpdatePasswordDto,
};
use crate::features::accounts::services::AccountService;
use crate::features::auth::guards::{RequireNationalOperator, RequireOperator};
use crate::shared::types::{ApiResponse, Meta};

/// List accounts by role, filtered by a search term (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/accounts",
    params(AccountQueryParams),
    responses(
        (status = 200, description = "Accounts on the requested page", body = ApiResponse<Vec<AccountDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required")
    ),
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_accounts(
    RequireOperator(_user): RequireOperator,
    State(service): State<Arc<AccountService>>,
    Query(params): Query<AccountQueryParams>,
) -> Result<Json<ApiResponse<Vec<AccountDto>>>> {
    let page = service.list(&params).await?;
    let paginator = page.paginator;
    let items = page.items.into_iter().map(AccountDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta::paged(
            paginator.total_items(),
            paginator.current_page(),
            paginator.page_size(),
            paginator.total_pages(),
        )),
    )))
}

/// Account profile with reports and intervention history
#[utoipa::path(
    get,
    path = "/api/admin/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account profile", body = ApiResponse<AccountProfileDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required"),
        (status = 404, description = "Account not found")
    ),
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_account_profile(
    RequireOperator(_user): RequireOperator,
    State(service): State<Arc<AccountService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountProfileDto>>> {
    let profile = service.get_profile(id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdateAccountDto,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<AccountDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required"),
        (status = 404, description = "Account not found")
    ),
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_account(
    RequireOperator(_user): RequireOperator,
    State(service): State<Arc<AccountService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateAccountDto>,
) -> Result<Json<ApiResponse<AccountDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let account = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(account.into()),
        Some("Account updated successfully".to_string()),
        None,
    )))
}

/// Activate a deactivated account, or deactivate an active one
#[utoipa::path(
    patch,
    path = "/api/admin/accounts/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account with its new status", body = ApiResponse<AccountDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required, or own account"),
        (status = 404, description = "Account not found")
    ),
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_account_active(
    RequireOperator(user): RequireOperator,
    State(service): State<Arc<AccountService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountDto>>> {
    let account = service.toggle_active(id, &user).await?;
    let message = if account.is_active {
        "Account activated"
    } else {
        "Account deactivated"
    };

    Ok(Json(ApiResponse::success(
        Some(account.into()),
        Some(message.to_string()),
        None,
    )))
}

/// Delete an account and its identity
///
/// Requires `?confirm=true`. When the identity cannot be removed the account is
/// still gone and `identity_deleted` is false; the identity then appears in
/// the orphan list.
#[utoipa::path(
    delete,
    path = "/api/admin/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        ("confirm" = bool, Query, description = "Must be true")
    ),
    responses(
        (status = 200, description = "Account deleted", body = ApiResponse<DeleteAccountResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required, or own account"),
        (status = 404, description = "Account not found"),
        (status = 428, description = "Confirmation required")
    ),
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(
    RequireOperator(user): RequireOperator,
    _confirmed: Confirmed,
    State(service): State<Arc<AccountService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteAccountResponseDto>>> {
    let result = service.delete(id, &user).await?;
    let message = if result.identity_deleted {
        "Account deleted"
    } else {
        "Account deleted, but its identity could not be removed and is now listed as an orphan"
    };

    Ok(Json(ApiResponse::success(
        Some(result),
        Some(message.to_string()),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/admin/accounts/{id}/password",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdatePasswordDto,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required"),
        (status = 404, description = "Account not found"),
        (status = 502, description = "Identity provider error")
    ),
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_account_password(
    RequireOperator(_user): RequireOperator,
    State(service): State<Arc<AccountService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePasswordDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update_password(id, &dto.password).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Password updated successfully".to_string()),
        None,
    )))
}

/// Change an operator's authority level
#[utoipa::path(
    put,
    path = "/api/admin/accounts/{id}/authority",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdateAuthorityDto,
    responses(
        (status = 200, description = "Authority updated", body = ApiResponse<AccountDto>),
        (status = 400, description = "Not an operator account or role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - National operator access required"),
        (status = 404, description = "Account not found")
    ),
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_account_authority(
    RequireNationalOperator(_user): RequireNationalOperator,
    State(service): State<Arc<AccountService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateAuthorityDto>,
) -> Result<Json<ApiResponse<AccountDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let account = service.update_authority(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(account.into()),
        Some("Authority updated successfully".to_string()),
        None,
    )))
}
