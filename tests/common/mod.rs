#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use balungpisah_admin::core::error::{AppError, Result};
use balungpisah_admin::features::accounts::AccountService;
use balungpisah_admin::features::auth::model::AuthenticatedUser;
use balungpisah_admin::features::logto::{IdentityProvider, IdentityUser, NewIdentity};
use balungpisah_admin::features::reports::ReportService;
use sqlx::PgPool;
use uuid::Uuid;

pub const REQUIRES_DB: &str = "requires TEST_DATABASE_URL";

fn identity(id: &str, email: Option<String>, name: Option<String>) -> IdentityUser {
    IdentityUser {
        id: id.to_string(),
        username: None,
        name,
        primary_email: email,
        primary_phone: None,
        created_at: None,
        last_sign_in_at: None,
        is_suspended: false,
    }
}

/// In-memory identity provider with knobs for the failure paths
#[derive(Default)]
pub struct FakeIdentityProvider {
    users: Mutex<Vec<IdentityUser>>,
    deleted: Mutex<Vec<String>>,
    failing_deletes: HashSet<String>,
    reused_id: Option<String>,
}

impl FakeIdentityProvider {
    pub fn with_users(ids: &[&str]) -> Self {
        Self {
            users: Mutex::new(ids.iter().map(|id| identity(id, None, None)).collect()),
            ..Default::default()
        }
    }

    /// `delete_user` answers with a provider error for these ids
    pub fn failing_deletes(mut self, ids: &[&str]) -> Self {
        self.failing_deletes = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// `create_user` hands out `id` instead of a fresh one
    pub fn reusing_id(mut self, id: &str) -> Self {
        self.reused_id = Some(id.to_string());
        self
    }

    pub fn ids(&self) -> Vec<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.id.clone())
            .collect()
    }

    /// Ids successfully deleted, in call order
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn list_users(&self) -> Result<Vec<IdentityUser>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, new: NewIdentity) -> Result<IdentityUser> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.primary_email.as_deref() == Some(new.email.as_str()))
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let id = self
            .reused_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let user = identity(&id, Some(new.email), Some(new.name));
        users.push(user.clone());
        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        if self.failing_deletes.contains(user_id) {
            return Err(AppError::ExternalServiceError(
                "Logto API error: HTTP 500 Internal Server Error".to_string(),
            ));
        }

        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(AppError::NotFound(format!(
                "Identity '{}' not found",
                user_id
            )));
        }
        self.deleted.lock().unwrap().push(user_id.to_string());
        Ok(())
    }

    async fn update_password(&self, _user_id: &str, _password: &str) -> Result<()> {
        Ok(())
    }
}

/// Pool against TEST_DATABASE_URL with migrations applied
pub async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect(REQUIRES_DB);
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    balungpisah_admin::core::database::run_migrations(&pool)
        .await
        .expect("run migrations");
    pool
}

pub fn account_service(pool: &PgPool) -> AccountService {
    account_service_with(pool, Arc::new(FakeIdentityProvider::default()))
}

pub fn account_service_with(pool: &PgPool, identity: Arc<dyn IdentityProvider>) -> AccountService {
    AccountService::new(
        pool.clone(),
        identity,
        Arc::new(ReportService::new(pool.clone())),
        10,
    )
}

pub fn operator(sub: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: Uuid::new_v4().to_string(),
        sub: sub.to_string(),
        session_uid: None,
        roles: vec!["local_operator".to_string()],
    }
}

/// Every request through `router` carries `user`, skipping JWT validation
pub fn as_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

pub async fn insert_account(pool: &PgPool, name: &str, role: &str) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO accounts (auth_user_id, role, name, email)
        VALUES ($1, $2::account_role, $3, $4)
        RETURNING id
        "#,
    )
    .bind(format!("test-{}", Uuid::new_v4()))
    .bind(role)
    .bind(name)
    .bind(format!("{}@example.org", name.to_lowercase()))
    .fetch_one(pool)
    .await
    .expect("insert account")
}

pub async fn auth_user_id_of(pool: &PgPool, id: Uuid) -> String {
    sqlx::query_scalar("SELECT auth_user_id FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("account exists")
}

pub async fn account_exists(pool: &PgPool, id: Uuid) -> bool {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("check account")
}

pub async fn remove_accounts(pool: &PgPool, ids: &[Uuid]) {
    sqlx::query("DELETE FROM accounts WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await
        .expect("clean up accounts");
}

pub async fn remove_accounts_by_email(pool: &PgPool, email: &str) {
    sqlx::query("DELETE FROM accounts WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await
        .expect("clean up accounts");
}

pub fn is_forbidden(result: &Result<impl std::fmt::Debug>) -> bool {
    matches!(result, Err(AppError::Forbidden(_)))
}
