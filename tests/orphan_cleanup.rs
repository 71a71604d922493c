mod common;

use std::sync::Arc;

use balungpisah_admin::core::error::AppError;
use balungpisah_admin::features::orphans::OrphanService;
use common::FakeIdentityProvider;

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn single_delete_refuses_linked_and_reports_unknown_identities() {
    let pool = common::test_pool().await;
    let linked_account = common::insert_account(&pool, "Linked", "citizen").await;
    let linked = common::auth_user_id_of(&pool, linked_account).await;

    let provider = Arc::new(FakeIdentityProvider::with_users(&[&linked, "stray"]));
    let accounts = Arc::new(common::account_service(&pool));
    let service = OrphanService::new(accounts, provider.clone(), Vec::new(), 2);

    let orphans = service.list_orphans().await.expect("list orphans");
    assert!(orphans.iter().any(|o| o.id == "stray"));
    assert!(orphans.iter().all(|o| o.id != linked));

    let result = service.delete_orphan(&linked).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let result = service.delete_orphan("never-existed").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    service.delete_orphan("stray").await.expect("delete stray");
    assert_eq!(provider.ids(), vec![linked]);

    common::remove_accounts(&pool, &[linked_account]).await;
}
