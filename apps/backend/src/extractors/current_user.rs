use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::role::Role;
use crate::error::AppError;

/// Authenticated principal for the current request.
///
/// Attached to the request extensions by the bearer-auth middleware and
/// immutable for the lifetime of the request; there is no process-wide
/// ambient security context to consult.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    /// Authority strings granted to this principal.
    pub fn authorities(&self) -> Vec<&'static str> {
        self.role.authorities()
    }

    /// Authorization check for role-gated handlers.
    pub fn require_any_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        std::future::ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(AppError::unauthorized),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> CurrentUser {
        CurrentUser {
            id: 7,
            email: "user@example.test".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_any_role() {
        assert!(principal(Role::Admin)
            .require_any_role(&[Role::Admin])
            .is_ok());
        assert!(principal(Role::Manager)
            .require_any_role(&[Role::Admin, Role::Manager])
            .is_ok());

        match principal(Role::User).require_any_role(&[Role::Admin]) {
            Err(AppError::Forbidden) => {}
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
