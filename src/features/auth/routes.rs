use crate::features::auth::handler;
use axum::{routing::get, Router};

/// Routes that only need a valid token
pub fn routes() -> Router {
    Router::new().route("/api/auth/me", get(handler::get_me))
}
