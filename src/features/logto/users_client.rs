use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::logto::provider::{IdentityProvider, IdentityUser, NewIdentity};
use crate::features::logto::token_manager::LogtoTokenManager;
use crate::shared::constants::LOGTO_USERS_PAGE_SIZE;

/// Request to create a new user in Logto
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest<'a> {
    primary_email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdatePasswordRequest<'a> {
    password: &'a str,
}

/// Logto error response
#[derive(Debug, Default, Deserialize)]
struct LogtoErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: String,
}

impl LogtoErrorResponse {
    fn is_duplicate_email(&self) -> bool {
        self.code == "user.email_already_in_use"
            || self.code == "user.email.exists"
            || self.message.contains("already")
    }
}

/// Client for the Logto Management API user endpoints
pub struct LogtoUsersClient {
    token_manager: Arc<LogtoTokenManager>,
    http_client: reqwest::Client,
}

impl LogtoUsersClient {
    pub fn new(token_manager: Arc<LogtoTokenManager>) -> Self {
        Self {
            token_manager,
            http_client: reqwest::Client::new(),
        }
    }

    async fn access_token(&self) -> Result<String> {
        self.token_manager.get_access_token().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to get M2M token: {}", e))
        })
    }

    fn user_url(&self, user_id: &str) -> String {
        format!(
            "{}/api/users/{}",
            self.token_manager.api_base_url(),
            urlencoding::encode(user_id)
        )
    }

    /// Fetch one page of users plus the total reported by Logto
    async fn list_users_page(&self, page: u32) -> Result<(Vec<IdentityUser>, Option<usize>)> {
        let token = self.access_token().await?;
        let url = format!("{}/api/users", self.token_manager.api_base_url());

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("page", page), ("page_size", LOGTO_USERS_PAGE_SIZE)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users in Logto: {}", e);
                AppError::ExternalServiceError(format!("Failed to list users: {}", e))
            })?;

        let response = check_status(response).await?;

        let total = response
            .headers()
            .get("total-number")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());

        let users = response.json::<Vec<IdentityUser>>().await.map_err(|e| {
            tracing::error!("Failed to parse Logto users response: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse users response: {}", e))
        })?;

        Ok((users, total))
    }
}

#[async_trait]
impl IdentityProvider for LogtoUsersClient {
    async fn list_users(&self) -> Result<Vec<IdentityUser>> {
        let mut users = Vec::new();
        let mut page = 1;

        loop {
            let (batch, total) = self.list_users_page(page).await?;
            let batch_len = batch.len();
            users.extend(batch);

            let reached_total = total.is_some_and(|t| users.len() >= t);
            if batch_len < LOGTO_USERS_PAGE_SIZE as usize || reached_total {
                break;
            }
            page += 1;
        }

        tracing::debug!("Fetched {} users from Logto", users.len());
        Ok(users)
    }

    async fn create_user(&self, identity: NewIdentity) -> Result<IdentityUser> {
        let token = self.access_token().await?;
        let url = format!("{}/api/users", self.token_manager.api_base_url());

        let request_body = CreateUserRequest {
            primary_email: &identity.email,
            password: &identity.password,
            name: &identity.name,
        };

        tracing::debug!("Creating user in Logto: {}", identity.email);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user in Logto: {}", e);
                AppError::ExternalServiceError(format!("Failed to create user: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<LogtoErrorResponse>(&body).unwrap_or_default();
            if error.is_duplicate_email() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
            return Err(AppError::Validation(format!("Invalid request: {}", body)));
        }

        let response = check_status(response).await?;
        let user = response.json::<IdentityUser>().await.map_err(|e| {
            tracing::error!("Failed to parse Logto user response: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse user response: {}", e))
        })?;

        tracing::info!("Created Logto user: {}", user.id);
        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let token = self.access_token().await?;

        let response = self
            .http_client
            .delete(self.user_url(user_id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user {} in Logto: {}", user_id, e);
                AppError::ExternalServiceError(format!("Failed to delete user: {}", e))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Identity '{}' not found",
                user_id
            )));
        }

        check_status(response).await?;
        tracing::info!("Deleted Logto user: {}", user_id);
        Ok(())
    }

    async fn update_password(&self, user_id: &str, password: &str) -> Result<()> {
        let token = self.access_token().await?;
        let url = format!("{}/password", self.user_url(user_id));

        let response = self
            .http_client
            .patch(&url)
            .bearer_auth(&token)
            .json(&UpdatePasswordRequest { password })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to update password for {}: {}", user_id, e);
                AppError::ExternalServiceError(format!("Failed to update password: {}", e))
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "Identity '{}' not found",
                user_id
            ))),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Validation(format!(
                    "Password rejected by identity provider: {}",
                    body
                )))
            }
            _ => {
                check_status(response).await?;
                tracing::info!("Updated password for Logto user: {}", user_id);
                Ok(())
            }
        }
    }
}

/// Turn a non-2xx Logto response into an ExternalServiceError
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!("Logto API error: HTTP {} - {}", status, body);
    Err(AppError::ExternalServiceError(format!(
        "Logto API error: HTTP {}",
        status
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_detection() {
        let error: LogtoErrorResponse = serde_json::from_str(
            r#"{"code":"user.email_already_in_use","message":"This email is associated with an existing account."}"#,
        )
        .unwrap();
        assert!(error.is_duplicate_email());

        let error: LogtoErrorResponse =
            serde_json::from_str(r#"{"code":"guard.invalid_input","message":"bad"}"#).unwrap();
        assert!(!error.is_duplicate_email());
    }

    #[test]
    fn test_identity_user_parses_logto_payload() {
        let user: IdentityUser = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "username": null,
            "primaryEmail": "agent@example.org",
            "primaryPhone": null,
            "name": "Field Agent",
            "createdAt": 1735689600000i64,
            "lastSignInAt": null,
            "isSuspended": false,
            "customData": {}
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.primary_email.as_deref(), Some("agent@example.org"));
        assert_eq!(user.created_at, Some(1735689600000));
    }
}
