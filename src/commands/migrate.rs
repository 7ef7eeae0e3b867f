//! Migrate command - Step the shop schema up, down, or rebuild it.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::open(&config).await?;
    for line in run(&db, args.action).await? {
        println!("{}", line);
    }
    Ok(())
}

/// Apply `action` and describe the outcome, one line per entry.
pub async fn run(db: &Database, action: MigrateAction) -> AppResult<Vec<String>> {
    let report = match action {
        MigrateAction::Up => {
            let applied = db.apply_pending().await?;
            tracing::info!(applied, "Pending migrations applied");
            vec![format!("applied {} migration(s)", applied)]
        }
        MigrateAction::Down => match db.revert_last().await? {
            Some(name) => {
                tracing::info!(migration = %name, "Migration reverted");
                vec![format!("reverted {}", name)]
            }
            None => {
                tracing::warn!("No applied migration to revert");
                vec!["nothing to revert".to_string()]
            }
        },
        MigrateAction::Status => db
            .migration_states()
            .await?
            .iter()
            .map(ToString::to_string)
            .collect(),
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all shop tables");
            let applied = db.reset().await?;
            tracing::info!(applied, "Schema rebuilt");
            vec![format!("rebuilt schema with {} migration(s)", applied)]
        }
    };

    Ok(report)
}
