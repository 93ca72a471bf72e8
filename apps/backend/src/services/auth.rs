//! Login, registration, refresh and logout orchestration.
//!
//! Every path that issues tokens runs its ledger writes inside a single
//! transaction, so revoking a subject's outstanding tokens and inserting
//! the replacements is atomic with respect to concurrent logins.

use std::time::SystemTime;

use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::role::Role;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::error_code::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::{tokens, users};
use crate::services::tokens::{self as token_service, IssuedTokens};
use crate::state::app_state::AppState;

/// Registration input. The raw password never outlives this call.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(AppError::validation(
            ErrorCode::InvalidEmail,
            "A valid email address is required",
        ));
    }
    Ok(())
}

/// Create an account and hand back its first token pair.
pub async fn register(state: &AppState, account: NewAccount) -> Result<IssuedTokens, AppError> {
    validate_email(&account.email)?;
    if account.password.is_empty() {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "Password cannot be empty",
        ));
    }

    let db = require_db(state)?;
    if users::find_by_email(db, &account.email).await?.is_some() {
        return Err(AppError::conflict(
            ErrorCode::UniqueEmail,
            "An account with this email already exists",
        ));
    }

    let password_hash = hash_password(&account.password)?;
    let new_user = users::NewUser {
        email: account.email,
        password_hash,
        first_name: account.first_name,
        last_name: account.last_name,
        role: account.role.unwrap_or(Role::User),
    };

    let security = state.security.clone();
    with_txn(state, move |txn| {
        Box::pin(async move {
            let user = users::create(txn, new_user).await?;
            let issued = token_service::issue(&user, SystemTime::now(), &security)?;
            tokens::save(txn, user.id, &issued.access_token).await?;
            tokens::save(txn, user.id, &issued.refresh_token).await?;

            info!(
                user_id = user.id,
                email = %Redacted(&user.email),
                role = %user.role,
                "registered new account"
            );
            Ok(issued)
        })
    })
    .await
}

/// Verify credentials and rotate the subject's token pair.
///
/// All previously outstanding tokens are revoked before the fresh pair is
/// persisted (single-active-session policy).
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<IssuedTokens, AppError> {
    validate_email(email)?;

    let db = require_db(state)?;
    let user = users::find_by_email(db, email)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    if !verify_password(password, &user.password_hash) {
        info!(email = %Redacted(email), "login rejected: credentials did not verify");
        return Err(AppError::invalid_credentials());
    }

    let security = state.security.clone();
    with_txn(state, move |txn| {
        Box::pin(async move {
            let revoked = tokens::revoke_all_for_user(txn, user.id).await?;
            let issued = token_service::issue(&user, SystemTime::now(), &security)?;
            tokens::save(txn, user.id, &issued.access_token).await?;
            tokens::save(txn, user.id, &issued.refresh_token).await?;

            info!(user_id = user.id, revoked, "login issued a fresh token pair");
            Ok(issued)
        })
    })
    .await
}

/// Trade a refresh token for a new access token.
///
/// The response echoes the presented refresh token; only the access token
/// is re-minted and persisted.
pub async fn refresh(state: &AppState, refresh_token: &str) -> Result<IssuedTokens, AppError> {
    let db = require_db(state)?;
    let (user, access_token) =
        token_service::refresh_access(db, refresh_token, SystemTime::now(), &state.security)
            .await?;

    let refresh_echo = refresh_token.to_string();
    with_txn(state, move |txn| {
        Box::pin(async move {
            tokens::revoke_all_for_user(txn, user.id).await?;
            tokens::save(txn, user.id, &access_token).await?;

            info!(user_id = user.id, "access token refreshed");
            Ok(IssuedTokens {
                access_token,
                refresh_token: refresh_echo,
            })
        })
    })
    .await
}

/// Revoke the presented token. Values absent from the ledger are a
/// no-op, keeping logout idempotent.
pub async fn logout(state: &AppState, token_value: &str) -> Result<(), AppError> {
    let db = require_db(state)?;

    if let Some(token) = tokens::find_by_value(db, token_value).await? {
        tokens::revoke(db, &token).await?;
        info!(user_id = token.user_id, "token revoked on logout");
    }

    Ok(())
}
