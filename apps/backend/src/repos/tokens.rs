//! Token ledger functions for the domain layer (generic over ConnectionTrait).
//!
//! The ledger is the server-side record of every issued token. Rows are
//! inserted at issuance and flagged on revocation; they are never deleted
//! here, so the full issuance history stays available for audit.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    Set,
};

use crate::entities::tokens;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::infra::db_errors::map_db_err;

/// Ledger record for one issued token. `value` is write-once; only the
/// two flags mutate after insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: i64,
    pub value: String,
    pub user_id: i64,
    pub expired: bool,
    pub revoked: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl Token {
    /// Ledger-validity: neither flag has been set.
    pub fn is_active(&self) -> bool {
        !self.expired && !self.revoked
    }
}

/// Insert a freshly issued token.
///
/// Codec output is unique per (subject, issued-at), but the unique column
/// is still checked here so a duplicate surfaces as a conflict rather
/// than a driver error.
pub async fn save<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    value: &str,
) -> Result<Token, DomainError> {
    if find_by_value(conn, value).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::DuplicateToken,
            "token value already present in ledger",
        ));
    }

    let now = time::OffsetDateTime::now_utc();
    let token_active = tokens::ActiveModel {
        id: NotSet,
        value: Set(value.to_string()),
        user_id: Set(user_id),
        expired: Set(false),
        revoked: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = token_active.insert(conn).await.map_err(map_db_err)?;
    Ok(Token::from(model))
}

/// Exact lookup by raw token value.
pub async fn find_by_value<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    value: &str,
) -> Result<Option<Token>, DomainError> {
    let model = tokens::Entity::find()
        .filter(tokens::Column::Value.eq(value))
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(model.map(Token::from))
}

/// Every token ever issued for the subject, revoked or not.
pub async fn find_all_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Token>, DomainError> {
    let models = tokens::Entity::find()
        .filter(tokens::Column::UserId.eq(user_id))
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(models.into_iter().map(Token::from).collect())
}

/// Tokens still outstanding for the subject.
///
/// The predicate is `expired = false OR revoked = false`: a token with
/// either flag still clear counts as outstanding. This matches the
/// ledger query this service replaces; revocation always sets both flags
/// together, so no row is ever left half-flagged by this crate.
pub async fn find_active_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Token>, DomainError> {
    let models = tokens::Entity::find()
        .filter(tokens::Column::UserId.eq(user_id))
        .filter(
            Condition::any()
                .add(tokens::Column::Expired.eq(false))
                .add(tokens::Column::Revoked.eq(false)),
        )
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(models.into_iter().map(Token::from).collect())
}

/// Flag every outstanding token for the subject as expired and revoked.
/// Returns the number of rows touched.
pub async fn revoke_all_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let result = tokens::Entity::update_many()
        .col_expr(tokens::Column::Expired, Expr::value(true))
        .col_expr(tokens::Column::Revoked, Expr::value(true))
        .col_expr(tokens::Column::UpdatedAt, Expr::value(now))
        .filter(tokens::Column::UserId.eq(user_id))
        .filter(
            Condition::any()
                .add(tokens::Column::Expired.eq(false))
                .add(tokens::Column::Revoked.eq(false)),
        )
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected)
}

/// Flag a single token as expired and revoked (logout path).
pub async fn revoke<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &Token,
) -> Result<(), DomainError> {
    let token_active = tokens::ActiveModel {
        id: Set(token.id),
        expired: Set(true),
        revoked: Set(true),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    token_active.update(conn).await.map_err(map_db_err)?;
    Ok(())
}

impl From<tokens::Model> for Token {
    fn from(model: tokens::Model) -> Self {
        Self {
            id: model.id,
            value: model.value,
            user_id: model.user_id,
            expired: model.expired,
            revoked: model.revoked,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
