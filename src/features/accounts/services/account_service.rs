use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::accounts::dtos::{
    AccountDto, AccountProfileDto, AccountQueryParams, CreateAgentDto, DeleteAccountResponseDto,
    ProfileStatsDto, UpdateAccountDto, UpdateAuthorityDto,
};
use crate::features::accounts::models::{Account, AccountRole};
use crate::features::accounts::services::listing::{filter_and_paginate, AccountPage};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::logto::{IdentityProvider, NewIdentity};
use crate::features::reports::ReportService;
use crate::shared::constants::MAX_PAGE_SIZE;

const ACCOUNT_COLUMNS: &str = r#"
    id, auth_user_id, role, name, surname, email, phone,
    authority_name, supervisor_id, is_active, created_at, updated_at
"#;

fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        // PostgreSQL unique violation
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Conflict("An account is already linked to this identity".to_string());
        }
    }
    AppError::Database(e)
}

/// Accounts table plus the identity provider behind it
pub struct AccountService {
    pool: PgPool,
    identity: Arc<dyn IdentityProvider>,
    reports: Arc<ReportService>,
    page_size: i64,
}

impl AccountService {
    pub fn new(
        pool: PgPool,
        identity: Arc<dyn IdentityProvider>,
        reports: Arc<ReportService>,
        page_size: i64,
    ) -> Self {
        Self {
            pool,
            identity,
            reports,
            page_size: page_size.max(1),
        }
    }

    /// Every account with `role` (or every account), newest first
    pub async fn fetch_by_role(&self, role: Option<AccountRole>) -> Result<Vec<Account>> {
        let sql = format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE ($1::account_role IS NULL OR role = $1)
            ORDER BY created_at DESC
            "#
        );

        sqlx::query_as::<_, Account>(&sql)
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch accounts (role {:?}): {:?}", role, e);
                AppError::Database(e)
            })
    }

    /// Fetch by role, then narrow and page in memory
    pub async fn list(&self, params: &AccountQueryParams) -> Result<AccountPage> {
        let accounts = self.fetch_by_role(params.role).await?;
        let page_size = params
            .page_size
            .map(|size| size.clamp(1, MAX_PAGE_SIZE))
            .unwrap_or(self.page_size);

        Ok(filter_and_paginate(
            accounts,
            params.search.as_deref(),
            params.page,
            page_size,
        ))
    }

    pub async fn get(&self, id: Uuid) -> Result<Account> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch account {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", id)))
    }

    pub async fn find_by_auth_user_id(&self, auth_user_id: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE auth_user_id = $1");

        sqlx::query_as::<_, Account>(&sql)
            .bind(auth_user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to look up account for identity {}: {:?}",
                    auth_user_id,
                    e
                );
                AppError::Database(e)
            })
    }

    /// Account, its supervisor, reports with media and intervention history
    pub async fn get_profile(&self, id: Uuid) -> Result<AccountProfileDto> {
        let account = self.get(id).await?;

        let supervisor = match account.supervisor_id {
            Some(supervisor_id) => match self.get(supervisor_id).await {
                Ok(supervisor) => Some(AccountDto::from(supervisor)),
                Err(AppError::NotFound(_)) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        let reports = self.reports.list_for_account(id).await?;
        let interventions = self.reports.list_interventions_for_account(id).await?;
        let stats = ProfileStatsDto::compute(&reports, &interventions);

        Ok(AccountProfileDto {
            account: account.into(),
            supervisor,
            reports,
            interventions,
            stats,
        })
    }

    /// Overwrite the provided profile fields, keeping the others
    pub async fn update(&self, id: Uuid, dto: UpdateAccountDto) -> Result<Account> {
        if dto.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let sql = format!(
            r#"
            UPDATE accounts
            SET name = COALESCE($2, name),
                surname = COALESCE($3, surname),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                authority_name = COALESCE($6, authority_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .bind(dto.name.as_deref().map(str::trim))
            .bind(dto.surname.as_deref().map(str::trim))
            .bind(dto.email.as_deref().map(str::trim))
            .bind(dto.phone.as_deref().map(str::trim))
            .bind(dto.authority_name.as_deref().map(str::trim))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update account {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", id)))?;

        tracing::info!("Updated account {}", id);
        Ok(account)
    }

    /// Flip `is_active` on exactly one row
    pub async fn toggle_active(&self, id: Uuid, caller: &AuthenticatedUser) -> Result<Account> {
        let target = self.get(id).await?;
        if target.auth_user_id == caller.sub {
            return Err(AppError::Forbidden(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let sql = format!(
            r#"
            UPDATE accounts
            SET is_active = NOT is_active, updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to toggle account {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", id)))?;

        tracing::info!(
            "Account {} is now {}",
            id,
            if account.is_active { "active" } else { "inactive" }
        );
        Ok(account)
    }

    /// Remove the account row, then its identity.
    ///
    /// The row goes first so a failed identity deletion leaves an orphan
    /// (visible and removable from the orphan list) instead of an account
    /// that can no longer sign in.
    pub async fn delete(
        &self,
        id: Uuid,
        caller: &AuthenticatedUser,
    ) -> Result<DeleteAccountResponseDto> {
        let account = self.get(id).await?;
        if account.auth_user_id == caller.sub {
            return Err(AppError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete account {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Account '{}' not found", id)));
        }

        let identity_deleted = match self.identity.delete_user(&account.auth_user_id).await {
            Ok(()) | Err(AppError::NotFound(_)) => true,
            Err(e) => {
                tracing::warn!(
                    "Account {} deleted but identity {} was not: {}",
                    id,
                    account.auth_user_id,
                    e
                );
                false
            }
        };

        tracing::info!("Deleted account {} ({})", id, account.role);
        Ok(DeleteAccountResponseDto {
            id,
            identity_deleted,
        })
    }

    /// Register an identity and an `agent` account supervised by an operator
    pub async fn create_agent(
        &self,
        dto: CreateAgentDto,
        caller: &AuthenticatedUser,
    ) -> Result<Account> {
        let supervisor_id = match dto.supervisor_id {
            Some(supervisor_id) => {
                let supervisor = match self.get(supervisor_id).await {
                    Err(AppError::NotFound(_)) => {
                        return Err(AppError::BadRequest(format!(
                            "Supervisor '{}' not found",
                            supervisor_id
                        )))
                    }
                    other => other?,
                };
                if !supervisor.role.is_operator() {
                    return Err(AppError::BadRequest(
                        "Supervisor must be an operator account".to_string(),
                    ));
                }
                Some(supervisor.id)
            }
            None => self
                .find_by_auth_user_id(&caller.sub)
                .await?
                .map(|account| account.id),
        };

        let name = dto.name.trim().to_string();
        let surname = dto
            .surname
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let email = dto.email.trim().to_lowercase();
        let display_name = match &surname {
            Some(surname) => format!("{} {}", name, surname),
            None => name.clone(),
        };

        let identity = self
            .identity
            .create_user(NewIdentity {
                email: email.clone(),
                password: dto.password,
                name: display_name,
            })
            .await?;

        let sql = format!(
            r#"
            INSERT INTO accounts (auth_user_id, role, name, surname, email, phone, supervisor_id)
            VALUES ($1, 'agent', $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Account>(&sql)
            .bind(&identity.id)
            .bind(&name)
            .bind(&surname)
            .bind(&email)
            .bind(dto.phone.as_deref().map(str::trim))
            .bind(supervisor_id)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(account) => {
                tracing::info!(
                    "Created agent {} (identity {}) supervised by {:?}",
                    account.id,
                    identity.id,
                    supervisor_id
                );
                Ok(account)
            }
            Err(e) => {
                tracing::error!("Failed to insert agent account for {}: {:?}", identity.id, e);
                if let Err(cleanup) = self.identity.delete_user(&identity.id).await {
                    tracing::error!(
                        "Failed to roll back identity {} after insert failure: {}",
                        identity.id,
                        cleanup
                    );
                }
                Err(map_db_error(e))
            }
        }
    }

    pub async fn update_password(&self, id: Uuid, password: &str) -> Result<()> {
        let account = self.get(id).await?;
        self.identity
            .update_password(&account.auth_user_id, password)
            .await?;
        tracing::info!("Password updated for account {}", id);
        Ok(())
    }

    /// Change an operator's authority level and/or institution
    pub async fn update_authority(&self, id: Uuid, dto: UpdateAuthorityDto) -> Result<Account> {
        let account = self.get(id).await?;
        check_authority_change(account.role, dto.role)?;

        let sql = format!(
            r#"
            UPDATE accounts
            SET role = $2,
                authority_name = COALESCE($3, authority_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .bind(dto.role)
            .bind(dto.authority_name.as_deref().map(str::trim))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update authority of account {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", id)))?;

        tracing::info!(
            "Account {} authority changed from {} to {}",
            id,
            account.role,
            updated.role
        );
        Ok(updated)
    }

    /// Identity ids that have an account row
    pub async fn linked_identity_ids(&self) -> Result<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT auth_user_id FROM accounts")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch linked identity ids: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(ids.into_iter().collect())
    }

    pub async fn is_linked(&self, auth_user_id: &str) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE auth_user_id = $1)")
            .bind(auth_user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check link for identity {}: {:?}", auth_user_id, e);
                AppError::Database(e)
            })
    }
}

/// Authority levels only exist between operator roles
fn check_authority_change(current: AccountRole, requested: AccountRole) -> Result<()> {
    if !current.is_operator() {
        return Err(AppError::BadRequest(format!(
            "Only operator accounts have an authority level (account is {})",
            current
        )));
    }
    if !requested.is_operator() {
        return Err(AppError::BadRequest(format!(
            "'{}' is not an operator role",
            requested
        )));
    }
    Ok(())
}
