use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Access tokens live for a day.
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Refresh tokens live for a week.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Token security settings. Read once at startup, immutable thereafter.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    /// Lifetime of access tokens
    pub access_ttl: Duration,
    /// Lifetime of refresh tokens
    pub refresh_ttl: Duration,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and default TTLs
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        }
    }

    /// Override both token lifetimes
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
