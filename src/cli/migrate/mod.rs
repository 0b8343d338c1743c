//! Migrate command - applies pending PostgreSQL migrations

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::observability::{init_tracing, shutdown_tracing};
use crate::infrastructure::storage::{
    connect_pool, pending_migrations, run_migrations, PostgresMigrator,
};

#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Report the applied version and pending migrations without applying them
    #[arg(long)]
    pub status: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, &config.observability.tracing);

    let result = migrate(&config, &args).await;
    shutdown_tracing();

    result
}

async fn migrate(config: &AppConfig, args: &MigrateArgs) -> anyhow::Result<()> {
    let pool = connect_pool(&config.database).await?;

    if args.status {
        let current = PostgresMigrator::new(pool.clone()).current_version().await?;
        let pending = pending_migrations(current);

        info!(current_version = ?current, pending = pending.len(), "Migration status");
        for migration in &pending {
            info!(
                version = migration.version,
                description = %migration.description,
                "Pending migration"
            );
        }
    } else {
        let applied = run_migrations(&pool).await?;
        info!(applied, "Migrations complete");
    }

    pool.close().await;

    Ok(())
}
