use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;

use crate::auth::role::Role;
use crate::error::AppError;
use crate::extractors::auth_token::{bearer_token, AuthToken};
use crate::services::auth::{self, NewAccount};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Create an account and return its first token pair
async fn register(
    req: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = req.into_inner();
    let issued = auth::register(
        &app_state,
        NewAccount {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
            role: body.role,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(issued))
}

/// Verify credentials and rotate the caller's token pair
async fn authenticate(
    req: web::Json<AuthenticateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let issued = auth::login(&app_state, &req.email, &req.password).await?;
    Ok(HttpResponse::Ok().json(issued))
}

/// Mint a fresh access token from a refresh token presented either as a
/// Bearer header or in the request body
async fn refresh_token(
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let presented = bearer_token(req.headers())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token))
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    let issued = auth::refresh(&app_state, &presented).await?;
    Ok(HttpResponse::Ok().json(issued))
}

/// Revoke the presented token
async fn logout(token: AuthToken, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    auth::logout(&app_state, &token.token).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/authenticate").route(web::post().to(authenticate)))
        .service(web::resource("/refresh-token").route(web::post().to(refresh_token)))
        .service(web::resource("/logout").route(web::post().to(logout)));
}
