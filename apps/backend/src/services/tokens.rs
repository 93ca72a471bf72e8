//! Token issuance and validation.

use std::collections::BTreeMap;
use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::jwt::{self, unix_seconds};
use crate::error::AppError;
use crate::errors::error_code::ErrorCode;
use crate::repos::users::{self, User};
use crate::state::security_config::SecurityConfig;

/// Access/refresh pair handed back by issuance. Field names double as the
/// wire names of the auth endpoints' response body.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

fn access_claims(user: &User) -> BTreeMap<String, Value> {
    let mut extra = BTreeMap::new();
    extra.insert("role".to_string(), json!(user.role));
    extra
}

/// Mint the access/refresh pair for a user.
///
/// Two mints with distinct TTLs and claim sets: the access token carries
/// the user's role as a custom claim, the refresh token carries none.
/// Persisting the pair in the ledger is the caller's job.
pub fn issue(
    user: &User,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<IssuedTokens, AppError> {
    let access_token = jwt::mint_token(
        &user.email,
        access_claims(user),
        now,
        security.access_ttl,
        security,
    )?;
    let refresh_token = jwt::mint_token(
        &user.email,
        BTreeMap::new(),
        now,
        security.refresh_ttl,
        security,
    )?;

    Ok(IssuedTokens {
        access_token,
        refresh_token,
    })
}

/// Claims-validity of a token for a given user.
///
/// Signature or encoding failures propagate as errors; a subject mismatch
/// or a passed expiry yields `Ok(false)`: expiry is a validity fact, not
/// a fault.
pub fn is_valid(
    token: &str,
    user: &User,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<bool, AppError> {
    let claims = jwt::parse_token(token, security)?;
    let now_secs = unix_seconds(now)?;
    Ok(claims.sub == user.email && claims.exp > now_secs)
}

/// Validate a refresh token and mint a replacement access token for its
/// subject, without requiring re-authentication.
///
/// Ledger writes are the caller's responsibility. Fails `TokenExpired` /
/// `TokenSignatureInvalid` / `TokenMalformed` if the refresh token itself
/// is invalid, `UserNotFound` if its subject no longer resolves.
pub async fn refresh_access<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    refresh_token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<(User, String), AppError> {
    let claims = jwt::parse_token(refresh_token, security)?;
    if claims.exp <= unix_seconds(now)? {
        return Err(AppError::token_expired());
    }

    let user = users::find_by_email(conn, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    let access_token = jwt::mint_token(
        &user.email,
        access_claims(&user),
        now,
        security.access_ttl,
        security,
    )?;

    Ok((user, access_token))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use serde_json::json;

    use super::{is_valid, issue};
    use crate::auth::jwt::parse_token;
    use crate::auth::role::Role;
    use crate::error::AppError;
    use crate::repos::users::User;
    use crate::state::security_config::SecurityConfig;

    fn make_user(email: &str, role: Role) -> User {
        let now = time::OffsetDateTime::now_utc();
        User {
            id: 1,
            email: email.to_string(),
            password_hash: "$2b$12$irrelevant".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_then_is_valid() {
        let sec = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
        let user = make_user("alice@example.test", Role::User);
        let now = SystemTime::now();

        let issued = issue(&user, now, &sec).unwrap();
        assert_ne!(issued.access_token, issued.refresh_token);

        assert!(is_valid(&issued.access_token, &user, now, &sec).unwrap());
        assert!(is_valid(&issued.refresh_token, &user, now, &sec).unwrap());
    }

    #[test]
    fn test_claim_sets_differ_between_pair_members() {
        let sec = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
        let user = make_user("bob@example.test", Role::Manager);

        let issued = issue(&user, SystemTime::now(), &sec).unwrap();

        let access = parse_token(&issued.access_token, &sec).unwrap();
        let refresh = parse_token(&issued.refresh_token, &sec).unwrap();

        assert_eq!(access.extra.get("role"), Some(&json!("MANAGER")));
        assert!(refresh.extra.is_empty());
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_subject_mismatch_is_false_not_error() {
        let sec = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
        let alice = make_user("alice@example.test", Role::User);
        let mallory = make_user("mallory@example.test", Role::User);
        let now = SystemTime::now();

        let issued = issue(&alice, now, &sec).unwrap();
        assert!(!is_valid(&issued.access_token, &mallory, now, &sec).unwrap());
    }

    #[test]
    fn test_passed_expiry_is_false_not_error() {
        let sec = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
        let user = make_user("carol@example.test", Role::User);
        let now = SystemTime::now();

        let issued = issue(&user, now, &sec).unwrap();

        // Evaluate validity one hour past the access TTL.
        let later = now + sec.access_ttl + Duration::from_secs(3600);
        assert!(!is_valid(&issued.access_token, &user, later, &sec).unwrap());
    }

    #[test]
    fn test_garbage_token_propagates_error() {
        let sec = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
        let user = make_user("dave@example.test", Role::User);

        match is_valid("garbage", &user, SystemTime::now(), &sec) {
            Err(AppError::TokenMalformed) => {}
            other => panic!("expected TokenMalformed, got {other:?}"),
        }
    }
}
