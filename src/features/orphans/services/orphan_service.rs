use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::core::error::{AppError, Result};
use crate::features::accounts::AccountService;
use crate::features::logto::{IdentityProvider, IdentityUser};
use crate::features::orphans::dtos::{
    BulkDeleteOrphansResponseDto, OrphanDeletionFailureDto, OrphanIdentityDto,
};

/// Finds and removes identities that have no account row
pub struct OrphanService {
    accounts: Arc<AccountService>,
    identity: Arc<dyn IdentityProvider>,
    ignored: HashSet<String>,
    concurrency: usize,
}

impl OrphanService {
    pub fn new(
        accounts: Arc<AccountService>,
        identity: Arc<dyn IdentityProvider>,
        ignored: impl IntoIterator<Item = String>,
        concurrency: usize,
    ) -> Self {
        Self {
            accounts,
            identity,
            ignored: ignored.into_iter().collect(),
            concurrency: concurrency.max(1),
        }
    }

    pub async fn list_orphans(&self) -> Result<Vec<OrphanIdentityDto>> {
        let identities = self.identity.list_users().await?;
        let linked = self.accounts.linked_identity_ids().await?;

        let orphans = find_orphans(identities, &linked, &self.ignored);
        tracing::debug!("Found {} orphan identities", orphans.len());
        Ok(orphans)
    }

    /// Delete one orphan. Linked or ignored identities are refused.
    pub async fn delete_orphan(&self, auth_user_id: &str) -> Result<()> {
        if self.ignored.contains(auth_user_id) {
            return Err(AppError::Forbidden(format!(
                "Identity '{}' is protected from cleanup",
                auth_user_id
            )));
        }

        if self.accounts.is_linked(auth_user_id).await? {
            return Err(AppError::Conflict(format!(
                "Identity '{}' belongs to an account; delete the account instead",
                auth_user_id
            )));
        }

        self.identity.delete_user(auth_user_id).await?;
        tracing::info!("Deleted orphan identity {}", auth_user_id);
        Ok(())
    }

    /// Delete every current orphan, continuing past individual failures
    pub async fn delete_all_orphans(&self) -> Result<BulkDeleteOrphansResponseDto> {
        let orphans = self.list_orphans().await?;
        let ids = orphans.into_iter().map(|o| o.id).collect();
        Ok(self.delete_listed(ids).await)
    }

    /// Delete identities from an orphan list the caller already holds
    pub async fn delete_listed(&self, ids: Vec<String>) -> BulkDeleteOrphansResponseDto {
        let tally = delete_identities(self.identity.as_ref(), ids, self.concurrency).await;
        tracing::info!(
            "Orphan cleanup finished: {} deleted, {} failed of {}",
            tally.deleted,
            tally.failed,
            tally.total_orphans
        );
        tally
    }
}

/// Identities whose id is neither linked to an account nor ignored, in provider order
pub fn find_orphans(
    identities: Vec<IdentityUser>,
    linked: &HashSet<String>,
    ignored: &HashSet<String>,
) -> Vec<OrphanIdentityDto> {
    identities
        .into_iter()
        .filter(|u| !linked.contains(&u.id) && !ignored.contains(&u.id))
        .map(OrphanIdentityDto::from)
        .collect()
}

/// Delete `ids` with at most `concurrency` requests in flight.
///
/// An identity that is already gone counts as deleted.
pub async fn delete_identities(
    identity: &dyn IdentityProvider,
    ids: Vec<String>,
    concurrency: usize,
) -> BulkDeleteOrphansResponseDto {
    let total_orphans = ids.len();

    let outcomes: Vec<(String, Result<()>)> = stream::iter(ids)
        .map(|id| async move {
            let outcome = identity.delete_user(&id).await;
            (id, outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut tally = BulkDeleteOrphansResponseDto {
        total_orphans,
        ..Default::default()
    };

    for (id, outcome) in outcomes {
        match outcome {
            Ok(()) | Err(AppError::NotFound(_)) => tally.deleted += 1,
            Err(e) => {
                tracing::warn!("Failed to delete orphan identity {}: {}", id, e);
                tally.failed += 1;
                tally.failures.push(OrphanDeletionFailureDto {
                    id,
                    error: e.to_string(),
                });
            }
        }
    }

    tally.failures.sort_by(|a, b| a.id.cmp(&b.id));
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        identity_user, lazy_account_service, InMemoryIdentityProvider,
    };

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_orphans_are_identities_minus_linked_minus_ignored() {
        let identities = ["admin", "a", "b", "c", "d"]
            .iter()
            .map(|id| identity_user(id))
            .collect();

        let orphans = find_orphans(identities, &set(&["a", "c"]), &set(&["admin"]));
        let ids: Vec<&str> = orphans.iter().map(|o| o.id.as_str()).collect();

        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_no_orphans_when_everything_is_linked() {
        let identities = vec![identity_user("a"), identity_user("b")];
        assert!(find_orphans(identities, &set(&["a", "b", "zombie"]), &HashSet::new()).is_empty());
    }

    #[tokio::test]
    async fn test_bulk_delete_tally_adds_up() {
        let provider =
            InMemoryIdentityProvider::with_ids(&["o1", "o2", "o3", "o4", "o5"]).failing_on(&["o2", "o4"]);
        let ids: Vec<String> = provider.ids();

        let tally = delete_identities(&provider, ids, 2).await;

        assert_eq!(tally.total_orphans, 5);
        assert_eq!(tally.deleted, 3);
        assert_eq!(tally.failed, 2);
        assert_eq!(tally.deleted + tally.failed, tally.total_orphans);
        let failed: Vec<&str> = tally.failures.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(failed, vec!["o2", "o4"]);
        assert_eq!(provider.ids(), vec!["o2".to_string(), "o4".to_string()]);
    }

    #[tokio::test]
    async fn test_bulk_delete_counts_already_gone_as_deleted() {
        let provider = InMemoryIdentityProvider::with_ids(&["o1"]);
        let ids = vec!["o1".to_string(), "vanished".to_string()];

        let tally = delete_identities(&provider, ids, 4).await;

        assert_eq!(tally.deleted, 2);
        assert_eq!(tally.failed, 0);
        assert!(tally.failures.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_delete_with_nothing_to_do() {
        let provider = InMemoryIdentityProvider::default();
        let tally = delete_identities(&provider, Vec::new(), 0).await;
        assert_eq!(tally, BulkDeleteOrphansResponseDto::default());
    }

    #[tokio::test]
    async fn test_delete_listed_only_touches_the_given_ids() {
        let provider = Arc::new(InMemoryIdentityProvider::with_ids(&["o1", "o2", "o3"]));
        let service = OrphanService::new(
            lazy_account_service(),
            provider.clone(),
            Vec::new(),
            2,
        );

        let tally = service
            .delete_listed(vec!["o1".to_string(), "o2".to_string()])
            .await;

        assert_eq!(tally.total_orphans, 2);
        assert_eq!(tally.deleted, 2);
        assert_eq!(provider.ids(), vec!["o3".to_string()]);
    }
}
