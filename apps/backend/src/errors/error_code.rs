//! Error codes for the authentication backend API.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses. Add new codes here; never pass ad-hoc
//! strings as error codes.

use core::fmt;

/// Centralized error codes for the authentication backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Token cannot be parsed
    TokenMalformed,
    /// Token integrity check failed
    TokenSignatureInvalid,
    /// Token has passed its embedded expiry
    TokenExpired,
    /// Token was revoked server-side
    TokenRevoked,
    /// Token is absent from the ledger
    TokenNotFound,
    /// Email/password pair did not verify
    InvalidCredentials,
    /// Access denied
    Forbidden,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Email already registered
    UniqueEmail,
    /// Token value already present in the ledger
    DuplicateToken,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // Database Constraint Violations
    /// Unique constraint violation (generic 409)
    UniqueViolation,
    /// Foreign key constraint violation (generic 409)
    FkViolation,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error
    /// code, exactly as it appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Authentication & Authorization
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::TokenSignatureInvalid => "TOKEN_SIGNATURE_INVALID",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",

            // Request Validation
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            // Resource Not Found
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::DuplicateToken => "DUPLICATE_TOKEN",
            Self::Conflict => "CONFLICT",

            // Database Constraint Violations
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",

            // System Errors
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
