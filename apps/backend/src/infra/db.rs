//! Database infrastructure: connection bootstrap and migrations.

use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connect to the database for the given profile and bring the schema up
/// to date. Single entrypoint used by main, the state builder and tests.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile)?;

    let mut options = ConnectOptions::new(url.clone());
    options.sqlx_logging(false);
    if url.starts_with("sqlite") {
        // In-memory SQLite is per-connection; a single connection keeps
        // every session on the same database.
        options.max_connections(1);
    } else {
        options
            .max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5))
            .acquire_timeout(Duration::from_secs(5));
    }

    let conn = Database::connect(options)
        .await
        .map_err(|e| AppError::db(format!("failed to connect to database: {e}")))?;

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("failed to run migrations: {e}")))?;

    info!(?profile, "database ready");
    Ok(conn)
}
