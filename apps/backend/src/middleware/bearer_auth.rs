//! Bearer-token authentication middleware
//!
//! Runs once per request, before any handler: extracts a bearer token,
//! resolves its subject and, when both the signed claims and the token
//! ledger agree the token is valid, attaches a `CurrentUser` principal to
//! the request extensions. The middleware itself never rejects a request
//! over a token fault; handlers that need a principal enforce that
//! through the `CurrentUser` extractor, and role checks happen in the
//! handlers. The only failures produced here are storage failures.

use std::rc::Rc;
use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ResponseError;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::jwt;
use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::auth_token::bearer_token;
use crate::extractors::current_user::CurrentUser;
use crate::repos::{tokens, users};
use crate::services::tokens as token_service;
use crate::state::app_state::AppState;

/// Path prefix exempt from token interception. The endpoints under it do
/// their own credential checks.
pub const PUBLIC_PATH_PREFIX: &str = "/api/v1/auth";

pub struct BearerAuth;

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Public authentication endpoints handle their own credentials.
            if req.path().starts_with(PUBLIC_PATH_PREFIX) {
                return service.call(req).await.map(|res| res.map_into_left_body());
            }

            // Absent credentials are not a failure here; downstream
            // authorization decides whether the route needs a principal.
            let Some(token) = bearer_token(req.headers()) else {
                return service.call(req).await.map(|res| res.map_into_left_body());
            };

            let Some(app_state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let e = AppError::internal("AppState not available");
                return Ok(req.into_response(e.error_response()).map_into_right_body());
            };

            if req.extensions().get::<CurrentUser>().is_none() {
                match authenticate(&token, &app_state).await {
                    Ok(Some(principal)) => {
                        req.extensions_mut().insert(principal);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        return Ok(req.into_response(e.error_response()).map_into_right_body());
                    }
                }
            }

            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

/// Decide whether the token identifies a principal.
///
/// Token faults (malformed, bad signature, expired, revoked, absent from
/// the ledger, unknown subject) yield `Ok(None)`: the request simply
/// stays unauthenticated. Storage faults stay errors; a ledger outage
/// must not read as "everyone logged out".
async fn authenticate(token: &str, state: &AppState) -> Result<Option<CurrentUser>, AppError> {
    let security = &state.security;

    // Expiry-tolerant read: a time-expired token still names a subject,
    // and its ledger record still gets consulted below.
    let subject = match jwt::extract_subject(token, security) {
        Ok(subject) => subject,
        Err(e) => {
            debug!(error = %e, "bearer token rejected during subject extraction");
            return Ok(None);
        }
    };

    let db = require_db(state)?;

    let Some(user) = users::find_by_email(db, &subject).await? else {
        debug!("bearer token subject unknown to the user directory");
        return Ok(None);
    };

    // Ledger-validity: record exists and neither flag is set. Absence is
    // invalid, not an error.
    let ledger_valid = tokens::find_by_value(db, token)
        .await?
        .map(|t| t.is_active())
        .unwrap_or(false);

    // Claims-validity; during interception every token fault collapses
    // to "no principal".
    let claims_valid =
        token_service::is_valid(token, &user, SystemTime::now(), security).unwrap_or(false);

    if ledger_valid && claims_valid {
        Ok(Some(CurrentUser {
            id: user.id,
            email: user.email,
            role: user.role,
        }))
    } else {
        debug!(
            user_id = user.id,
            ledger_valid, claims_valid, "bearer token rejected"
        );
        Ok(None)
    }
}
