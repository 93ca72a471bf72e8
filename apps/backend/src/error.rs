use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::error_code::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    #[error("TokenMalformed")]
    TokenMalformed,
    #[error("TokenSignatureInvalid")]
    TokenSignatureInvalid,
    #[error("TokenExpired")]
    TokenExpired,
    #[error("TokenRevoked")]
    TokenRevoked,
    #[error("TokenNotFound")]
    TokenNotFound,
    #[error("InvalidCredentials")]
    InvalidCredentials,
    #[error("Forbidden")]
    Forbidden,
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Database timeout")]
    DbTimeout,
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Error code carried in the problem-details `code` field
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Unauthorized => ErrorCode::Unauthorized,
            AppError::UnauthorizedMissingBearer => ErrorCode::UnauthorizedMissingBearer,
            AppError::TokenMalformed => ErrorCode::TokenMalformed,
            AppError::TokenSignatureInvalid => ErrorCode::TokenSignatureInvalid,
            AppError::TokenExpired => ErrorCode::TokenExpired,
            AppError::TokenRevoked => ErrorCode::TokenRevoked,
            AppError::TokenNotFound => ErrorCode::TokenNotFound,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::DbUnavailable => ErrorCode::DbUnavailable,
            AppError::DbTimeout => ErrorCode::DbTimeout,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Human-readable detail for the problem-details body
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::UnauthorizedMissingBearer => "Missing or malformed Bearer token".to_string(),
            AppError::TokenMalformed => "Token could not be parsed".to_string(),
            AppError::TokenSignatureInvalid => "Token integrity check failed".to_string(),
            AppError::TokenExpired => "Token expired".to_string(),
            AppError::TokenRevoked => "Token has been revoked".to_string(),
            AppError::TokenNotFound => "Token not present in the ledger".to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::Db { detail } => detail.clone(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
            AppError::DbTimeout => "Database timed out".to_string(),
            AppError::Internal { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized
            | AppError::UnauthorizedMissingBearer
            | AppError::TokenMalformed
            | AppError::TokenSignatureInvalid
            | AppError::TokenExpired
            | AppError::TokenRevoked
            | AppError::TokenNotFound
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Db { .. }
            | AppError::DbUnavailable
            | AppError::DbTimeout
            | AppError::Internal { .. }
            | AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn token_malformed() -> Self {
        Self::TokenMalformed
    }

    pub fn token_signature_invalid() -> Self {
        Self::TokenSignatureInvalid
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn token_revoked() -> Self {
        Self::TokenRevoked
    }

    pub fn token_not_found() -> Self {
        Self::TokenNotFound
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => {
                AppError::validation(ErrorCode::ValidationError, detail)
            }
            DomainError::Conflict(kind, detail) => match kind {
                ConflictKind::UniqueEmail => AppError::conflict(ErrorCode::UniqueEmail, detail),
                ConflictKind::DuplicateToken => {
                    AppError::conflict(ErrorCode::DuplicateToken, detail)
                }
                ConflictKind::UniqueViolation => {
                    AppError::conflict(ErrorCode::UniqueViolation, detail)
                }
                ConflictKind::FkViolation => AppError::conflict(ErrorCode::FkViolation, detail),
                _ => AppError::conflict(ErrorCode::Conflict, detail),
            },
            DomainError::NotFound(kind, detail) => match kind {
                NotFoundKind::User => AppError::not_found(ErrorCode::UserNotFound, detail),
                NotFoundKind::Token => AppError::token_not_found(),
                _ => AppError::not_found(ErrorCode::NotFound, detail),
            },
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::Timeout => AppError::DbTimeout,
                InfraErrorKind::DbUnavailable => AppError::DbUnavailable,
                InfraErrorKind::DataCorruption => AppError::internal(detail),
                _ => AppError::db(detail),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().to_string();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://gatehouse.app/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
