//! Shared helpers for integration tests.
#![allow(dead_code)]

pub mod auth;

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::middleware::bearer_auth::BearerAuth;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use serde_json::json;

pub const TEST_JWT_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

/// AppState over a fresh, migrated test database.
pub async fn test_state() -> AppState {
    test_state_with_security(SecurityConfig::new(TEST_JWT_SECRET)).await
}

pub async fn test_state_with_security(security: SecurityConfig) -> AppState {
    build_state()
        .with_db(DbProfile::Test)
        .with_security(security)
        .build()
        .await
        .expect("test state should build")
}

/// Initialized test service with the production routes and the bearer
/// authentication middleware, mirroring main.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(BearerAuth)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

/// Register an account through the HTTP surface and return the token
/// pair from the response body.
pub async fn register_user<S, B>(app: &S, email: &str, password: &str) -> serde_json::Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    register_user_with_role(app, email, password, None).await
}

pub async fn register_user_with_role<S, B>(
    app: &S,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> serde_json::Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let mut payload = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": password
    });
    if let Some(role) = role {
        payload["role"] = json!(role);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "register should succeed");
    test::read_body_json(resp).await
}
