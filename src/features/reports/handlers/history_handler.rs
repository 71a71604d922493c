use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::guards::RequireOperator;
use crate::features::reports::dtos::ResolutionHistoryDto;
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List resolved reports with their interventions (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/history",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Resolution history", body = ApiResponse<Vec<ResolutionHistoryDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Operator access required")
    ),
    tag = "history",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_resolution_history(
    RequireOperator(_user): RequireOperator,
    State(service): State<Arc<ReportService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ResolutionHistoryDto>>>> {
    let (items, paginator) = service
        .resolution_history(params.page, params.limit())
        .await?;

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
