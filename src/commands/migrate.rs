//! Migrate command: apply, roll back and inspect schema migrations.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let outcome = match args.action {
        MigrateAction::Up => {
            tracing::info!("Applying pending migrations");
            db.run_migrations().await
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back the last migration");
            db.rollback_migration().await
        }
        MigrateAction::Status => {
            for (name, applied) in db
                .migration_status()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?
            {
                println!("{}: {}", name, if applied { "applied" } else { "pending" });
            }
            return Ok(());
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and reapplying every migration");
            db.fresh_migrations().await
        }
    };

    outcome.map_err(|e| AppError::internal(e.to_string()))?;
    tracing::info!("Migration command finished");
    Ok(())
}
