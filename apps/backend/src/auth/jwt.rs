//! Signed token claims codec.
//!
//! Minting and parsing of the HS256 tokens this service issues. Expiry is
//! deliberately not enforced at parse time: a passed expiry is a validity
//! fact judged by callers, and the request interceptor must still be able
//! to read the subject out of a time-expired token so it can consult the
//! ledger record and react precisely instead of failing at the parse.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Claims embedded in every token this service signs.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the owning user's email
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Token id. Issuance timestamps have second granularity, so this is
    /// what keeps two tokens minted in the same second distinct; the
    /// ledger's unique `value` column depends on it.
    pub jti: String,
    /// Custom claims (e.g. `role` on access tokens)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

pub(crate) fn unix_seconds(now: SystemTime) -> Result<i64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("system clock is before the Unix epoch"))
}

/// Mint a signed token for `sub` with the given TTL and custom claims.
pub fn mint_token(
    sub: &str,
    extra: BTreeMap<String, Value>,
    now: SystemTime,
    ttl: Duration,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_seconds(now)?;
    let exp = iat + ttl.as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
        extra,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("failed to encode JWT: {e}")))
}

/// Verify the signature and decode the claims.
///
/// Errors:
/// - Failed integrity check → `AppError::TokenSignatureInvalid`
/// - Unparsable encoding → `AppError::TokenMalformed`
pub fn parse_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    // Pin the algorithm; leave expiry to the caller.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::token_signature_invalid(),
        _ => AppError::token_malformed(),
    })
}

/// Read the subject out of a well-signed token, expired or not.
pub fn extract_subject(token: &str, security: &SecurityConfig) -> Result<String, AppError> {
    parse_token(token, security).map(|claims| claims.sub)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde_json::json;

    use super::{extract_subject, mint_token, parse_token, unix_seconds};
    use crate::error::AppError;
    use crate::state::security_config::SecurityConfig;

    const TTL: Duration = Duration::from_secs(15 * 60);

    fn security() -> SecurityConfig {
        SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
    }

    #[test]
    fn test_mint_and_parse_roundtrip() {
        let sec = security();
        let now = SystemTime::now();
        let mut extra = BTreeMap::new();
        extra.insert("role".to_string(), json!("ADMIN"));

        let token = mint_token("alice@example.test", extra, now, TTL, &sec).unwrap();
        let claims = parse_token(&token, &sec).unwrap();

        assert_eq!(claims.sub, "alice@example.test");
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.exp, claims.iat + TTL.as_secs() as i64);
        assert_eq!(claims.extra.get("role"), Some(&json!("ADMIN")));
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_same_second_mints_are_distinct() {
        let sec = security();
        let now = SystemTime::now();

        let a = mint_token("alice@example.test", BTreeMap::new(), now, TTL, &sec).unwrap();
        let b = mint_token("alice@example.test", BTreeMap::new(), now, TTL, &sec).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expired_token_still_parses() {
        let sec = security();
        // Issued two hours ago with a one-hour TTL
        let then = SystemTime::now() - Duration::from_secs(2 * 3600);
        let token =
            mint_token("bob@example.test", BTreeMap::new(), then, Duration::from_secs(3600), &sec)
                .unwrap();

        let claims = parse_token(&token, &sec).expect("expiry must not be judged at parse time");
        assert!(claims.exp < unix_seconds(SystemTime::now()).unwrap());

        // Subject extraction tolerates the passed expiry too.
        let sub = extract_subject(&token, &sec).unwrap();
        assert_eq!(sub, "bob@example.test");
    }

    #[test]
    fn test_wrong_secret_fails_signature_check() {
        let sec_a = SecurityConfig::new("secret-A".as_bytes());
        let sec_b = SecurityConfig::new("secret-B".as_bytes());

        let token =
            mint_token("carol@example.test", BTreeMap::new(), SystemTime::now(), TTL, &sec_a)
                .unwrap();

        match parse_token(&token, &sec_b) {
            Err(AppError::TokenSignatureInvalid) => {}
            other => panic!("expected TokenSignatureInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let sec = security();
        let token =
            mint_token("dave@example.test", BTreeMap::new(), SystemTime::now(), TTL, &sec).unwrap();

        // Flip the first character of the signature segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let sig = &parts[2];
        let replacement = if sig.starts_with('A') { "B" } else { "A" };
        parts[2] = format!("{replacement}{}", &sig[1..]);
        let tampered = parts.join(".");

        match parse_token(&tampered, &sec) {
            Err(AppError::TokenSignatureInvalid) => {}
            other => panic!("expected TokenSignatureInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_is_malformed() {
        let sec = security();
        match parse_token("definitely-not-a-jwt", &sec) {
            Err(AppError::TokenMalformed) => {}
            other => panic!("expected TokenMalformed, got {other:?}"),
        }
        match extract_subject("still.not_a.jwt", &sec) {
            Err(AppError::TokenMalformed) => {}
            other => panic!("expected TokenMalformed, got {other:?}"),
        }
    }
}
