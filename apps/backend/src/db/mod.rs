pub mod txn;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Centralized helper to access the database connection from AppState.
///
/// Returns `AppError::DbUnavailable` when no database is configured. The
/// error stays loud all the way out: a missing ledger must never read as
/// "unauthenticated".
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(AppError::db_unavailable)
}
