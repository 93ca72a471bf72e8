//! Mapping from sea-orm errors to domain errors.

use sea_orm::{ConnAcquireErr, DbErr, SqlErr};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};

/// Map a low-level database error into the domain error vocabulary.
///
/// Constraint violations become conflicts; everything connection-shaped
/// stays an infra error so callers surface it instead of degrading it.
pub fn map_db_err(e: DbErr) -> DomainError {
    if let Some(sql_err) = e.sql_err() {
        return match sql_err {
            SqlErr::UniqueConstraintViolation(detail) => {
                DomainError::conflict(ConflictKind::UniqueViolation, detail)
            }
            SqlErr::ForeignKeyConstraintViolation(detail) => {
                DomainError::conflict(ConflictKind::FkViolation, detail)
            }
            _ => DomainError::infra(InfraErrorKind::Other("sql".to_string()), e.to_string()),
        };
    }

    match &e {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
            DomainError::infra(InfraErrorKind::Timeout, e.to_string())
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            DomainError::infra(InfraErrorKind::DbUnavailable, e.to_string())
        }
        _ => DomainError::infra(InfraErrorKind::Other("db".to_string()), e.to_string()),
    }
}
