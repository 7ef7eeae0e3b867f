//! Database connection and schema management.
//!
//! `serve` brings the schema up to date on start; the `migrate` command
//! drives the same [`Migrator`] step by step and reports what it did.

use std::fmt;

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// A known migration and whether it has run against this database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.applied { "applied" } else { "pending" };
        write!(f, "{}: {}", self.name, status)
    }
}

/// Shared handle on the shop database
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the database and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::open(config).await?;

        let applied = db.apply_pending().await.map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            e
        })?;
        tracing::info!(applied, "Database connected, schema up to date");

        Ok(db)
    }

    /// Open the database without touching the schema.
    pub async fn open(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Apply every pending migration, returning how many ran.
    pub async fn apply_pending(&self) -> Result<usize, DbErr> {
        let pending = Migrator::get_pending_migrations(&self.connection).await?.len();
        if pending > 0 {
            Migrator::up(&self.connection, None).await?;
        }
        Ok(pending)
    }

    /// Revert the most recent migration, returning its name.
    ///
    /// `None` when nothing has been applied yet.
    pub async fn revert_last(&self) -> Result<Option<String>, DbErr> {
        let last = Migrator::get_applied_migrations(&self.connection)
            .await?
            .last()
            .map(|m| m.name().to_string());

        if last.is_some() {
            Migrator::down(&self.connection, Some(1)).await?;
        }
        Ok(last)
    }

    /// Every known migration in order, with its applied flag.
    pub async fn migration_states(&self) -> Result<Vec<MigrationState>, DbErr> {
        let migrations = Migrator::get_migration_with_status(&self.connection).await?;

        Ok(migrations
            .iter()
            .map(|m| MigrationState {
                name: m.name().to_string(),
                applied: matches!(m.status(), MigrationStatus::Applied),
            })
            .collect())
    }

    /// Drop every table and rebuild the schema, returning the migration count.
    pub async fn reset(&self) -> Result<usize, DbErr> {
        Migrator::fresh(&self.connection).await?;
        Ok(Migrator::migrations().len())
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
