use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Resolution history routes (nested under /api/admin)
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/history", get(handlers::list_resolution_history))
        .with_state(service)
}
