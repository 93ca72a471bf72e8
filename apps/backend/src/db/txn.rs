//! Transaction helper for multi-step ledger writes.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionError, TransactionTrait};

use super::require_db;
use crate::error::AppError;
use crate::infra::db_errors::map_db_err;
use crate::state::app_state::AppState;

/// Boxed future type the transaction closure must return.
pub type TxnFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>;

/// Execute a closure inside a database transaction: commit on Ok, roll
/// back on Err.
///
/// Issuance and revocation for a single subject go through here so that
/// revoke-then-insert is atomic per subject: two concurrent logins may
/// interleave freely, but each observes the other's ledger writes
/// entirely or not at all.
pub async fn with_txn<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    T: Send,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, T> + Send,
{
    let db = require_db(state)?;

    db.transaction(f).await.map_err(|e| match e {
        TransactionError::Connection(db_err) => AppError::from(map_db_err(db_err)),
        TransactionError::Transaction(app_err) => app_err,
    })
}
