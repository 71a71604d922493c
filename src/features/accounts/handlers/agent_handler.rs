use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::accounts::dtos::{AccountDto, CreateAgentDto};
use crate::features::accounts::services::AccountService;
use crate::features::auth::guards::RequireOperator;
use crate::shared::types::ApiResponse;

/// Create a field agent account
///
/// Registers the identity first; if the account row cannot be written the
/// identity is removed again.
#[utoipa::path(
    post,
    path = "/api/admin/agents",
    request_body = CreateAgentDto,
    responses(
        (status = 201, description = "Agent created", body = ApiResponse<AccountDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required"),
        (status = 409, description = "Email already registered"),
        (status = 502, description = "Identity provider error")
    ),
    tag = "agents",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_agent(
    RequireOperator(user): RequireOperator,
    State(service): State<Arc<AccountService>>,
    AppJson(dto): AppJson<CreateAgentDto>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let account = service.create_agent(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(account.into()),
            Some("Agent created successfully".to_string()),
            None,
        )),
    ))
}
