pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm::{Database, DatabaseConnection, DbErr};

mod m20250901_000001_create_auth_tables; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250901_000001_create_auth_tables::Migration)]
    }
}

/// Migration commands supported by the CLI and test bootstrap.
#[derive(Debug, Clone, Copy)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Status,
}

/// Run a migration command against an already-open connection.
/// Used by both the CLI and the backend's DB bootstrap.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    tracing::info!("migration cmd={command:?}");

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            tracing::info!("migration cmd={command:?} ok");
            Ok(())
        }
        Err(e) => {
            tracing::error!("migration cmd={command:?} failed: {e}");
            Err(e)
        }
    }
}
