mod support;

use actix_web::test;
use backend_test_support::unique_helpers::unique_email;
use serde_json::json;
use support::auth::bearer;
use support::{
    create_test_app, register_user, test_state, test_state_with_security, TEST_JWT_SECRET,
};

#[actix_web::test]
async fn test_register_returns_token_pair_that_authenticates(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let email = unique_email("register");
    let body = register_user(&app, &email, "correct horse battery staple").await;

    let access = body["access_token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);

    // The fresh access token authenticates against a protected route.
    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let me: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(me["email"].as_str().unwrap(), email);
    assert_eq!(me["role"].as_str().unwrap(), "USER");
    assert!(me["authorities"]
        .as_array()
        .unwrap()
        .contains(&json!("ROLE_USER")));

    Ok(())
}

#[actix_web::test]
async fn test_register_duplicate_email_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let email = unique_email("dup");
    register_user(&app, &email, "first password").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "first_name": "Eve",
            "last_name": "Clone",
            "email": email,
            "password": "second password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);

    let content_type = resp.headers().get("content-type").unwrap();
    assert!(content_type
        .to_str()
        .unwrap()
        .contains("application/problem+json"));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"].as_str().unwrap(), "UNIQUE_EMAIL");

    Ok(())
}

#[actix_web::test]
async fn test_register_validation_errors() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await;
    let app = create_test_app(state).await;

    // Empty email
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "", "password": "pw" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"].as_str().unwrap(), "INVALID_EMAIL");

    // Missing password
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": unique_email("nopw") }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"].as_str().unwrap(), "VALIDATION_ERROR");

    Ok(())
}

#[actix_web::test]
async fn test_authenticate_happy_path_and_failures() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let email = unique_email("login");
    register_user(&app, &email, "hunter2hunter2").await;

    // Correct credentials rotate the pair.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/authenticate")
        .set_json(json!({ "email": email, "password": "hunter2hunter2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());

    // Wrong password.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/authenticate")
        .set_json(json!({ "email": email, "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"].as_str().unwrap(), "INVALID_CREDENTIALS");

    // Unknown subject.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/authenticate")
        .set_json(json!({ "email": unique_email("ghost"), "password": "whatever" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"].as_str().unwrap(), "USER_NOT_FOUND");

    Ok(())
}

#[actix_web::test]
async fn test_refresh_rotates_access_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let email = unique_email("refresh");
    let body = register_user(&app, &email, "a perfectly fine password").await;
    let old_access = body["access_token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    // Present the refresh token in the body.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh-token")
        .set_json(json!({ "refresh_token": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let refreshed: serde_json::Value = test::read_body_json(resp).await;

    let new_access = refreshed["access_token"].as_str().unwrap().to_string();
    assert_ne!(new_access, old_access);
    assert_eq!(refreshed["refresh_token"].as_str().unwrap(), refresh);

    // The new access token works...
    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header(bearer(&new_access))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    // ...and the pre-refresh access token was revoked.
    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header(bearer(&old_access))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);

    Ok(())
}

#[actix_web::test]
async fn test_refresh_accepts_bearer_header() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let email = unique_email("refresh-hdr");
    let body = register_user(&app, &email, "a perfectly fine password").await;
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh-token")
        .insert_header(bearer(&refresh))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    // No token anywhere → 401.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh-token")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["code"].as_str().unwrap(),
        "UNAUTHORIZED_MISSING_BEARER"
    );

    Ok(())
}

#[actix_web::test]
async fn test_refresh_with_expired_refresh_token_fails() -> Result<(), Box<dyn std::error::Error>>
{
    use std::time::Duration;

    use backend::state::security_config::SecurityConfig;

    // Refresh tokens expire instantly; access tokens stay valid.
    let security = SecurityConfig::new(TEST_JWT_SECRET)
        .with_ttls(Duration::from_secs(24 * 3600), Duration::ZERO);
    let state = test_state_with_security(security).await;
    let app = create_test_app(state).await;

    let email = unique_email("refresh-expired");
    let body = register_user(&app, &email, "a perfectly fine password").await;
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh-token")
        .set_json(json!({ "refresh_token": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"].as_str().unwrap(), "TOKEN_EXPIRED");

    Ok(())
}

#[actix_web::test]
async fn test_logout_revokes_presented_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await;
    let app = create_test_app(state).await;

    let email = unique_email("logout");
    let body = register_user(&app, &email, "a perfectly fine password").await;
    let access = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);

    // The token no longer authenticates.
    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header(bearer(&access))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);

    // Logging out an unknown token is a silent no-op.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer("unknown.token.value"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    Ok(())
}
