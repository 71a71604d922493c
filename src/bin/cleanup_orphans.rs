//! One-shot orphan identity cleanup.
//!
//! Lists Logto users that have no account row. Nothing is deleted unless
//! `--execute` is passed, and then only the identities that were listed.

use std::sync::Arc;

use balungpisah_admin::core::config::Config;
use balungpisah_admin::core::database;
use balungpisah_admin::features::accounts::AccountService;
use balungpisah_admin::features::logto::{IdentityProvider, LogtoTokenManager, LogtoUsersClient};
use balungpisah_admin::features::orphans::OrphanService;
use balungpisah_admin::features::reports::ReportService;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cleanup-orphans", about = "Delete identities that have no account")]
struct Args {
    /// Actually delete the orphans (default is a dry run)
    #[arg(long)]
    execute: bool,

    /// Override ORPHAN_DELETE_CONCURRENCY
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let pool = database::create_pool(&config.database).await?;

    let token_manager = Arc::new(LogtoTokenManager::new(config.logto_m2m.clone()));
    let identity: Arc<dyn IdentityProvider> = Arc::new(LogtoUsersClient::new(token_manager));
    let reports = Arc::new(ReportService::new(pool.clone()));
    let accounts = Arc::new(AccountService::new(
        pool,
        Arc::clone(&identity),
        reports,
        config.admin.page_size,
    ));
    let orphans = OrphanService::new(
        accounts,
        identity,
        config.admin.orphan_ignored_user_ids.clone(),
        args.concurrency.unwrap_or(config.admin.orphan_delete_concurrency),
    );

    let found = orphans.list_orphans().await?;
    tracing::info!("Found {} orphan identities", found.len());
    for orphan in &found {
        tracing::info!(
            "  {} {} <{}>",
            orphan.id,
            orphan.name.as_deref().unwrap_or("-"),
            orphan.email.as_deref().unwrap_or("-")
        );
    }

    if !args.execute {
        tracing::info!("Dry run; pass --execute to delete them");
        return Ok(());
    }

    let ids = found.into_iter().map(|o| o.id).collect();
    let tally = orphans.delete_listed(ids).await;
    tracing::info!(
        "Deleted {} of {} orphan identities ({} failed)",
        tally.deleted,
        tally.total_orphans,
        tally.failed
    );
    for failure in &tally.failures {
        tracing::warn!("  {}: {}", failure.id, failure.error);
    }

    if tally.failed > 0 {
        anyhow::bail!("{} orphan identities could not be deleted", tally.failed);
    }
    Ok(())
}
