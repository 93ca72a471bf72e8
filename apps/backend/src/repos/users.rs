//! User directory functions for the domain layer (generic over ConnectionTrait).

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::auth::role::Role;
use crate::entities::users;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db_errors::map_db_err;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// New account data handed over by the registration flow. The password is
/// already hashed by the time it reaches the directory.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let model = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
        .map_err(map_db_err)?;
    model.map(User::try_from).transpose()
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let model = users::Entity::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(map_db_err)?;
    model.map(User::try_from).transpose()
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser,
) -> Result<User, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: NotSet,
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        role: Set(new_user.role.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = user_active.insert(conn).await.map_err(map_db_err)?;
    User::try_from(model)
}

// Conversion between the SeaORM model and the domain model

impl TryFrom<users::Model> for User {
    type Error = DomainError;

    fn try_from(model: users::Model) -> Result<Self, DomainError> {
        let role = Role::parse(&model.role).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("unknown role '{}' for user {}", model.role, model.id),
            )
        })?;

        Ok(Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
