use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::accounts::handlers;
use crate::features::accounts::services::AccountService;

/// Account and agent routes (nested under /api/admin)
pub fn routes(service: Arc<AccountService>) -> Router {
    Router::new()
        .route("/accounts", get(handlers::list_accounts))
        .route(
            "/accounts/{id}",
            get(handlers::get_account_profile)
                .patch(handlers::update_account)
                .delete(handlers::delete_account),
        )
        .route("/accounts/{id}/active", patch(handlers::toggle_account_active))
        .route(
            "/accounts/{id}/password",
            put(handlers::update_account_password),
        )
        .route(
            "/accounts/{id}/authority",
            put(handlers::update_account_authority),
        )
        .route("/agents", post(handlers::create_agent))
        .with_state(service)
}
