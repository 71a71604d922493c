use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::orphans::handlers;
use crate::features::orphans::services::OrphanService;

/// Orphan identity routes (nested under /api/admin)
pub fn routes(service: Arc<OrphanService>) -> Router {
    Router::new()
        .route(
            "/orphans",
            get(handlers::list_orphans).delete(handlers::delete_all_orphans),
        )
        .route("/orphans/{auth_user_id}", delete(handlers::delete_orphan))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_user_with_roles, lazy_account_service, with_auth, with_national_operator_auth,
        InMemoryIdentityProvider,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn service(provider: Arc<InMemoryIdentityProvider>) -> Arc<OrphanService> {
        Arc::new(OrphanService::new(
            lazy_account_service(),
            provider,
            vec!["super-admin".to_string()],
            4,
        ))
    }

    #[tokio::test]
    async fn test_bulk_delete_requires_national_operator() {
        let provider = Arc::new(InMemoryIdentityProvider::with_ids(&["o1"]));
        let app = with_auth(
            routes(service(provider.clone())),
            create_user_with_roles(&["local_operator"]),
        );
        let server = TestServer::new(app).unwrap();

        let response = server
            .delete("/orphans")
            .add_query_param("confirm", "true")
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(provider.ids(), vec!["o1".to_string()]);
    }

    #[tokio::test]
    async fn test_bulk_delete_without_confirm_does_nothing() {
        let provider = Arc::new(InMemoryIdentityProvider::with_ids(&["o1", "o2"]));
        let server =
            TestServer::new(with_national_operator_auth(routes(service(provider.clone()))))
                .unwrap();

        let response = server.delete("/orphans").await;

        response.assert_status(StatusCode::PRECONDITION_REQUIRED);
        assert_eq!(provider.ids().len(), 2);
    }

    #[tokio::test]
    async fn test_single_delete_without_confirm_does_nothing() {
        let provider = Arc::new(InMemoryIdentityProvider::with_ids(&["o1"]));
        let server =
            TestServer::new(with_national_operator_auth(routes(service(provider.clone()))))
                .unwrap();

        let response = server.delete("/orphans/o1").await;

        response.assert_status(StatusCode::PRECONDITION_REQUIRED);
        assert_eq!(provider.ids(), vec!["o1".to_string()]);
    }

    #[tokio::test]
    async fn test_ignored_identity_cannot_be_deleted() {
        let provider = Arc::new(InMemoryIdentityProvider::with_ids(&["super-admin"]));
        let server =
            TestServer::new(with_national_operator_auth(routes(service(provider.clone()))))
                .unwrap();

        let response = server
            .delete("/orphans/super-admin")
            .add_query_param("confirm", "true")
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(provider.ids(), vec!["super-admin".to_string()]);
    }

    #[tokio::test]
    async fn test_citizen_cannot_list_orphans() {
        let provider = Arc::new(InMemoryIdentityProvider::default());
        let app = with_auth(
            routes(service(provider)),
            create_user_with_roles(&["citizen"]),
        );
        let server = TestServer::new(app).unwrap();

        server.get("/orphans").await.assert_status(StatusCode::FORBIDDEN);
    }
}
