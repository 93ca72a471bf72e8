//! Token helpers for tests

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use backend::auth::jwt::mint_token;
use backend::state::security_config::SecurityConfig;

/// Mint a well-signed bearer token for the given subject. The token is
/// deliberately NOT persisted in the ledger.
pub fn mint_test_token(sub: &str, sec: &SecurityConfig) -> String {
    mint_token(sub, BTreeMap::new(), SystemTime::now(), sec.access_ttl, sec)
        .expect("should mint token successfully")
}

/// Full Authorization header value including the `Bearer ` prefix
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Mint a token whose embedded expiry is already in the past
pub fn mint_expired_token(sub: &str, sec: &SecurityConfig) -> String {
    let past = SystemTime::now() - Duration::from_secs(7200);
    mint_token(sub, BTreeMap::new(), past, Duration::from_secs(3600), sec)
        .expect("should mint expired token successfully")
}
