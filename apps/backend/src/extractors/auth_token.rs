use actix_web::http::header::{self, HeaderMap};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Authentication token extracted from the Authorization header
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthToken {
    pub token: String,
}

/// Parse a `Bearer <token>` Authorization header out of a header map.
///
/// Absent or non-Bearer headers are `None`, not an error: whether missing
/// credentials matter is the caller's decision.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        std::future::ready(
            bearer_token(req.headers())
                .map(|token| AuthToken { token })
                .ok_or_else(AppError::unauthorized_missing_bearer),
        )
    }
}
