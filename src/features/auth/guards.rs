//! Role-based authorization guards for the admin API.
//!
//! Role hierarchy (from highest to lowest):
//! - super_admin: Global admin
//! - national_operator: Changes authority levels, bulk identity cleanup
//! - regional_operator / local_operator: Day-to-day account and agent management
//!
//! Field agents and citizens have no access to the admin API.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated_user(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for operator level access.
///
/// Allows "super_admin" and every operator role.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireOperator(user): RequireOperator) { ... }
/// ```
pub struct RequireOperator(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireOperator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated_user(parts)?;

        if !user.has_operator_access() {
            return Err(AppError::Forbidden("Operator access required".to_string()));
        }

        Ok(RequireOperator(user.clone()))
    }
}

/// Guard for national operator level access.
///
/// Allows "super_admin" and "national_operator".
pub struct RequireNationalOperator(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireNationalOperator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated_user(parts)?;

        if !user.has_national_access() {
            return Err(AppError::Forbidden(
                "National operator access required".to_string(),
            ));
        }

        Ok(RequireNationalOperator(user.clone()))
    }
}
